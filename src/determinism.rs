//! Replica determinism check
//!
//! Optionally runs several independent controllers over the same replay on the
//! rayon pool and requires them to agree on the full result. Replicas share
//! only immutable inputs: the finalized config, the recorded actions and the
//! dictionary.

use crate::game::{
    ExecutionContext, ExecutionController, OutputMode, ReplayActionSource, RunLogger, SimResult,
    SimulationConfig, VerbosityLevel,
};
use crate::loader::Dictionary;
use crate::replay::ActionEvent;
use crate::supervisor::CancelSignal;
use crate::{HarnessError, Result};
use rayon::prelude::*;
use std::sync::Arc;

/// Everything needed to build a controller for one replay
///
/// Loggers are not shareable across threads, so each replica builds its own
/// from the verbosity and output mode stored here.
#[derive(Clone)]
pub struct ReplayJob {
    pub config: Arc<SimulationConfig>,
    pub actions: Arc<[ActionEvent]>,
    pub level_gen_checksum: i64,
    pub dictionary: Arc<dyn Dictionary>,
    pub verbosity: VerbosityLevel,
    pub output_mode: OutputMode,
    pub trace_every: Option<u64>,
}

impl ReplayJob {
    /// Controller for replica `index`; only replica 0 logs
    pub fn controller(&self, index: usize) -> ExecutionController {
        let verbosity = if index == 0 {
            self.verbosity
        } else {
            VerbosityLevel::Silent
        };
        let mut logger = RunLogger::with_verbosity(verbosity);
        logger.set_output_mode(self.output_mode);

        let ctx = ExecutionContext::headless(logger)
            .with_dictionary(Arc::clone(&self.dictionary))
            .with_trace_every(self.trace_every);

        ExecutionController::new(
            ctx,
            Arc::clone(&self.config),
            Box::new(ReplayActionSource::new(Arc::clone(&self.actions))),
            self.level_gen_checksum,
        )
    }

    /// Run a single controller to completion
    pub fn run(&self, cancel: &CancelSignal) -> Result<SimResult> {
        self.controller(0).run(cancel)
    }

    /// Run `replicas` controllers in parallel and require identical results
    pub fn run_replicas(&self, replicas: usize, cancel: &CancelSignal) -> Result<SimResult> {
        if replicas <= 1 {
            return self.run(cancel);
        }

        let results: Vec<SimResult> = (0..replicas)
            .into_par_iter()
            .map(|index| self.controller(index).run(cancel))
            .collect::<Result<Vec<_>>>()?;

        check_agreement(results)
    }
}

/// Return the first result if every replica produced the same one
fn check_agreement(results: Vec<SimResult>) -> Result<SimResult> {
    let mut results = results.into_iter();
    let first = results
        .next()
        .ok_or_else(|| HarnessError::Nondeterministic("no replica produced a result".to_string()))?;

    for (offset, other) in results.enumerate() {
        if other != first {
            return Err(HarnessError::Nondeterministic(format!(
                "replica {} ended at tick {} with hash {}, replica 0 at tick {} with hash {}",
                offset + 1,
                other.ticks,
                other.state_hash,
                first.ticks,
                first.state_hash
            )));
        }
    }

    Ok(first)
}
