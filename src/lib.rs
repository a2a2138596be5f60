//! Replay Harness - headless, deterministic replay verification
//!
//! Takes a recorded game session (configuration, level-generation checksum and
//! the player's actions), re-runs it without rendering or live input, and
//! reports whether the replay is valid and what outcome it produces.

pub mod core;
pub mod determinism;
pub mod error;
pub mod game;
pub mod harness;
pub mod loader;
pub mod outcome;
pub mod replay;
pub mod supervisor;

pub use error::{HarnessError, Result};
pub use harness::{Harness, HarnessOptions};
pub use outcome::{encode, InternalErrorKind, RunOutcome};
