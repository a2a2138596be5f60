//! Timeout supervisor
//!
//! Runs one simulation job on a blocking thread and bounds it by wall-clock
//! time. On expiry the job is told to stop through a one-shot cancellation
//! signal and is never observed again; the supervisor does not wait for it.

use crate::game::SimResult;
use crate::outcome::{InternalErrorKind, RunOutcome};
use crate::Result;
use std::any::Any;
use std::time::Duration;
use tokio::sync::watch;

/// Receiving side of the cancellation signal, polled between ticks
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that is never raised
    pub fn never() -> Self {
        CancelSignal { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

/// Sending side of the cancellation signal
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Raise the signal; idempotent
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Create a connected cancellation handle and signal
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx: Some(rx) })
}

/// Bounds a simulation job by a wall-clock budget
#[derive(Debug, Clone, Copy)]
pub struct TimeoutSupervisor {
    budget: Duration,
}

impl TimeoutSupervisor {
    pub fn new(budget: Duration) -> Self {
        TimeoutSupervisor { budget }
    }

    /// Run `job` to completion or until the budget expires
    ///
    /// Panics inside the job are caught here and reported as an internal
    /// error. Must be called from within a tokio runtime.
    pub async fn supervise<F>(&self, job: F) -> RunOutcome
    where
        F: FnOnce(CancelSignal) -> Result<SimResult> + Send + 'static,
    {
        let (handle, signal) = cancel_pair();
        let task = tokio::task::spawn_blocking(move || job(signal));

        match tokio::time::timeout(self.budget, task).await {
            Ok(Ok(Ok(result))) => RunOutcome::Completed { result },
            Ok(Ok(Err(err))) => RunOutcome::from_error(err),
            Ok(Err(join_err)) if join_err.is_panic() => RunOutcome::InternalError {
                kind: InternalErrorKind::Panic,
                detail: panic_detail(join_err.into_panic()),
            },
            Ok(Err(join_err)) => RunOutcome::from_error(join_err.into()),
            Err(_) => {
                handle.cancel();
                tracing::warn!(
                    target: "runsim",
                    "simulation exceeded its {:?} budget; cancelled",
                    self.budget
                );
                RunOutcome::TimedOut {
                    timeout_secs: self.budget.as_secs_f64(),
                }
            }
        }
    }
}

fn panic_detail(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("simulation panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("simulation panicked: {}", msg)
    } else {
        "simulation panicked".to_string()
    }
}
