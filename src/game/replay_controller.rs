//! Action source that plays back a recorded action stream
//!
//! Events are consumed strictly from the front. The stream is never sorted or
//! repaired: an event scheduled earlier than the tick being requested means
//! the recording is out of order (or has a negative tick) and the run fails.

use crate::game::controller::{ActionBatch, ActionSource};
use crate::replay::ActionEvent;
use crate::{HarnessError, Result};
use std::sync::Arc;

/// Plays back recorded actions in recorded order
///
/// The action list is shared behind an `Arc` so parallel replicas of one run
/// can read the same recording without copying it.
#[derive(Debug, Clone)]
pub struct ReplayActionSource {
    actions: Arc<[ActionEvent]>,
    /// Index of the next action to hand out
    cursor: usize,
}

impl ReplayActionSource {
    pub fn new(actions: impl Into<Arc<[ActionEvent]>>) -> Self {
        ReplayActionSource {
            actions: actions.into(),
            cursor: 0,
        }
    }

    /// The next action that has not been handed out yet
    pub fn peek(&self) -> Option<&ActionEvent> {
        self.actions.get(self.cursor)
    }
}

impl ActionSource for ReplayActionSource {
    fn actions_for_tick(&mut self, tick: u64) -> Result<ActionBatch> {
        let mut batch = ActionBatch::new();

        while let Some(event) = self.actions.get(self.cursor) {
            if event.tick < 0 || (event.tick as u64) < tick {
                return Err(HarnessError::ActionStreamCorrupt {
                    tick,
                    detail: format!(
                        "action #{} is scheduled for tick {} which has already passed",
                        self.cursor, event.tick
                    ),
                });
            }
            if event.tick as u64 > tick {
                break;
            }
            batch.push(event.clone());
            self.cursor += 1;
        }

        Ok(batch)
    }

    fn remaining(&self) -> usize {
        self.actions.len() - self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_by_tick() {
        let mut source = ReplayActionSource::new(vec![
            ActionEvent::noop(0, 0),
            ActionEvent::noop(0, 1),
            ActionEvent::noop(2, 0),
        ]);

        assert_eq!(source.actions_for_tick(0).unwrap().len(), 2);
        assert_eq!(source.remaining(), 1);
        assert!(source.actions_for_tick(1).unwrap().is_empty());
        assert_eq!(source.peek(), Some(&ActionEvent::noop(2, 0)));
        assert_eq!(source.actions_for_tick(2).unwrap().len(), 1);
        assert_eq!(source.remaining(), 0);
        assert!(source.actions_for_tick(3).unwrap().is_empty());
    }

    #[test]
    fn test_batch_preserves_recorded_order() {
        let mut source = ReplayActionSource::new(vec![
            ActionEvent::noop(1, 3),
            ActionEvent::noop(1, 0),
            ActionEvent::noop(1, 2),
        ]);
        source.actions_for_tick(0).unwrap();
        let actors: Vec<u32> = source
            .actions_for_tick(1)
            .unwrap()
            .iter()
            .map(|e| e.actor)
            .collect();
        assert_eq!(actors, vec![3, 0, 2]);
    }

    #[test]
    fn test_negative_tick_is_corrupt() {
        let mut source = ReplayActionSource::new(vec![ActionEvent::noop(-1, 0)]);
        assert!(matches!(
            source.actions_for_tick(0),
            Err(HarnessError::ActionStreamCorrupt { tick: 0, .. })
        ));
    }

    #[test]
    fn test_out_of_order_is_corrupt() {
        let mut source = ReplayActionSource::new(vec![
            ActionEvent::noop(5, 0),
            ActionEvent::noop(3, 0),
        ]);
        for tick in 0..5 {
            assert!(source.actions_for_tick(tick).unwrap().is_empty());
        }
        // The tick-3 event sits behind the tick-5 one and is caught as soon
        // as tick 5 is drained
        assert!(matches!(
            source.actions_for_tick(5),
            Err(HarnessError::ActionStreamCorrupt { tick: 5, .. })
        ));
    }

    #[test]
    fn test_skipped_tick_is_corrupt() {
        // The controller never skips ticks, but a source must not silently
        // drop events if it is asked out of sequence.
        let mut source = ReplayActionSource::new(vec![ActionEvent::noop(2, 0)]);
        assert!(source.actions_for_tick(4).is_err());
    }
}
