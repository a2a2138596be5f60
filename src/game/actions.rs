//! Applying recorded actions to the simulation

use crate::core::{ActorId, Pos, Priorities};
use crate::game::config::SimulationConfig;
use crate::game::state::SimulationState;
use crate::replay::{ActionEvent, ActionKind};
use crate::{HarnessError, Result};

impl SimulationState {
    /// Apply one recorded action at the current tick
    ///
    /// Any action the simulation cannot honour (unknown or destroyed actor,
    /// off-grid relocation, out-of-range priorities) means the stream does not
    /// belong to this simulation and is reported as corruption. A drone purchase
    /// the colony cannot afford is a legal no-op.
    pub fn apply_action(&mut self, config: &SimulationConfig, event: &ActionEvent) -> Result<()> {
        let tick = self.tick;
        let corrupt = |detail: String| HarnessError::ActionStreamCorrupt { tick, detail };

        let actor = ActorId::new(event.actor);
        let colony = self
            .colonies
            .get_mut(actor)
            .map_err(|_| corrupt(format!("unknown actor {}", event.actor)))?;
        if !colony.is_alive() {
            return Err(corrupt(format!("actor {} has been destroyed", event.actor)));
        }

        match &event.kind {
            ActionKind::Noop => {}
            ActionKind::Relocate { x, y } => {
                let target = Pos::new(*x, *y);
                if !target.in_bounds(config.world_width, config.world_height) {
                    return Err(corrupt(format!(
                        "relocate target {} is outside the {}x{} grid",
                        target, config.world_width, config.world_height
                    )));
                }
                colony.relocation_target = if target == colony.pos {
                    None
                } else {
                    Some(target)
                };
            }
            ActionKind::SetPriorities {
                gather,
                build,
                attack,
            } => {
                let priorities = Priorities::new(*gather, *build, *attack);
                if !priorities.is_valid() {
                    return Err(corrupt(format!(
                        "priority weights {}/{}/{} exceed {}",
                        gather,
                        build,
                        attack,
                        Priorities::MAX_WEIGHT
                    )));
                }
                colony.priorities = priorities;
            }
            ActionKind::BuildDrone => {
                if colony.drones < config.content.max_drones
                    && colony.try_spend(config.content.drone_cost)
                {
                    colony.drones += 1;
                    self.stats.drones_built += 1;
                }
            }
        }

        self.stats.actions_applied += 1;
        Ok(())
    }
}
