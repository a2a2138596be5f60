//! Action source trait
//!
//! The execution controller never knows where actions come from. It asks an
//! [`ActionSource`] for the batch scheduled at each tick, so a recorded replay,
//! a scripted test and (in a full game) live input all plug into the same loop.

use crate::replay::ActionEvent;
use crate::Result;
use smallvec::SmallVec;

/// Actions to apply at a single tick, in recorded order
///
/// Most ticks carry no action and busy ones rarely carry more than a few.
pub type ActionBatch = SmallVec<[ActionEvent; 4]>;

/// Supplies actions to the execution controller one tick at a time
///
/// Ticks are requested in strictly increasing order starting from 0.
pub trait ActionSource {
    /// Remove and return every action scheduled for `tick`
    ///
    /// Returns `ActionStreamCorrupt` if the next pending action is scheduled
    /// for a tick that has already passed.
    fn actions_for_tick(&mut self, tick: u64) -> Result<ActionBatch>;

    /// Number of actions not yet handed out
    fn remaining(&self) -> usize;
}

/// A source that never produces an action
///
/// Runs the simulation purely on its own rules; used for smoke tests and
/// benchmarks where no player input is wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleActionSource;

impl IdleActionSource {
    pub fn new() -> Self {
        IdleActionSource
    }
}

impl ActionSource for IdleActionSource {
    fn actions_for_tick(&mut self, _tick: u64) -> Result<ActionBatch> {
        Ok(ActionBatch::new())
    }

    fn remaining(&self) -> usize {
        0
    }
}
