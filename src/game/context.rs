//! Per-run execution context
//!
//! Everything a run needs beyond its configuration and its action source is
//! passed in explicitly here. Nothing is read from process-global state, so two
//! runs in one process (replicas, tests) cannot interfere.

use crate::game::logger::RunLogger;
use crate::loader::{Dictionary, EnglishDictionary};
use std::sync::Arc;

/// Explicit context for one execution controller
#[derive(Clone)]
pub struct ExecutionContext {
    /// Localized text for summary log lines
    pub dictionary: Arc<dyn Dictionary>,
    /// Run logger; owned by this run only
    pub logger: RunLogger,
    /// Record a state hash every N ticks; `None` disables the trace
    pub trace_every: Option<u64>,
}

impl ExecutionContext {
    /// Headless context with the built-in English dictionary
    pub fn headless(logger: RunLogger) -> Self {
        ExecutionContext {
            dictionary: Arc::new(EnglishDictionary::new()),
            logger,
            trace_every: None,
        }
    }

    pub fn with_dictionary(mut self, dictionary: Arc<dyn Dictionary>) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Enable the tick trace; zero is treated as disabled
    pub fn with_trace_every(mut self, every: Option<u64>) -> Self {
        self.trace_every = every.filter(|n| *n > 0);
        self
    }

    /// Localized text for a message key
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.dictionary.text(key)
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("lang", &self.dictionary.lang())
            .field("logger", &self.logger)
            .field("trace_every", &self.trace_every)
            .finish()
    }
}
