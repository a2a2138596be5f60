//! Centralized run logger
//!
//! Every stage of a run logs through one `RunLogger`. Messages are gated by
//! [`VerbosityLevel`], emitted as `tracing` events on the `runsim` target, and
//! can additionally be captured in memory so tests can assert on them.
//!
//! stdout belongs to the result record, so nothing here ever prints to it.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Verbosity level for run output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output
    Silent = 0,
    /// Minimal - stage transitions and the final outcome (default)
    #[default]
    Minimal = 1,
    /// Normal - applied actions and notable simulation events
    Normal = 2,
    /// Verbose - per-tick detail
    Verbose = 3,
}

impl VerbosityLevel {
    /// `tracing` filter directive that lets exactly this level through
    pub fn filter_directive(&self) -> &'static str {
        match self {
            VerbosityLevel::Silent => "runsim=off",
            VerbosityLevel::Minimal => "runsim=info",
            VerbosityLevel::Normal => "runsim=debug",
            VerbosityLevel::Verbose => "runsim=trace",
        }
    }
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Emit through `tracing` only (default)
    #[default]
    Emit,
    /// Capture only to the in-memory buffer
    Memory,
    /// Both emit and capture
    Both,
}

/// A captured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g. "action", "sim_event", "outcome")
    pub category: Option<&'static str>,
}

/// Guard type that provides read-only access to captured entries
pub struct LogGuard<'a> {
    guard: MutexGuard<'a, Vec<LogEntry>>,
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Logger owned by a single run
///
/// The harness keeps one for its own stages and hands a clone (fresh buffer,
/// same settings) to the simulation thread. The buffer sits behind a mutex so
/// the logger, and any future borrowing it, is `Send + Sync`.
pub struct RunLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: Mutex<Vec<LogEntry>>,
}

impl RunLogger {
    /// Create a logger with default verbosity (Minimal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    /// Create a logger with specified verbosity
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        RunLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: Mutex::new(Vec::new()),
        }
    }

    // A panic while holding the lock cannot leave the Vec half-written
    fn buffer(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.log_buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set output mode (Emit, Memory, or Both)
    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture into memory without emitting
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Access captured entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.buffer(),
        }
    }

    pub fn clear_logs(&self) {
        self.buffer().clear();
    }

    /// Log at Minimal level
    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    /// Log at Normal level
    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    /// Log at Verbose level
    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, None, message);
    }

    /// Log with an explicit category
    #[inline]
    pub fn categorized(&self, level: VerbosityLevel, category: &'static str, message: &str) {
        self.log(level, Some(category), message);
    }

    fn log(&self, level: VerbosityLevel, category: Option<&'static str>, message: &str) {
        if level == VerbosityLevel::Silent || level > self.verbosity {
            return;
        }

        if self.is_capturing() {
            self.buffer().push(LogEntry {
                level,
                message: message.to_string(),
                category,
            });
        }

        if matches!(self.output_mode, OutputMode::Emit | OutputMode::Both) {
            let category = category.unwrap_or("run");
            match level {
                VerbosityLevel::Silent => {}
                VerbosityLevel::Minimal => tracing::info!(target: "runsim", category, "{}", message),
                VerbosityLevel::Normal => tracing::debug!(target: "runsim", category, "{}", message),
                VerbosityLevel::Verbose => tracing::trace!(target: "runsim", category, "{}", message),
            }
        }
    }
}

impl Default for RunLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RunLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.buffer().len())
            .finish()
    }
}

impl Clone for RunLogger {
    /// Clones the settings; the capture buffer starts empty
    fn clone(&self) -> Self {
        RunLogger {
            verbosity: self.verbosity,
            output_mode: self.output_mode,
            log_buffer: Mutex::new(Vec::new()),
        }
    }
}
