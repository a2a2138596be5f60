//! Simulation state
//!
//! Owned solely by the execution controller. Every collection is an
//! id-ordered [`EntityStore`], so iterating the state is deterministic.

use crate::core::{Colony, Creep, CreepBase, EntityId, EntityStore, Pos, ResourceNode};
use crate::game::config::SimulationConfig;
use crate::{HarnessError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Hard cap on live creeps; exceeding it means the simulation ran away
pub const MAX_CREEPS: usize = 512;

/// Counters accumulated over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub resources_gathered: i64,
    pub drones_built: u32,
    pub creeps_spawned: u32,
    pub creeps_killed: u32,
    pub creep_bases_destroyed: u32,
    pub colonies_lost: u32,
    pub damage_taken: i64,
    pub actions_applied: u32,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Number of ticks already simulated
    pub tick: u64,

    /// Player colonies; their ids are the actor ids used by recorded actions
    pub colonies: EntityStore<Colony>,

    /// Creep bases, kept after destruction with zero hit points
    pub creep_bases: EntityStore<CreepBase>,

    /// Live creeps
    pub creeps: EntityStore<Creep>,

    pub resources: EntityStore<ResourceNode>,

    /// Gameplay RNG. Serialized so the state hash covers its position.
    pub rng: ChaCha12Rng,

    pub stats: RunStats,
}

impl SimulationState {
    /// Empty world with a seeded RNG
    pub fn new(seed: u64) -> Self {
        SimulationState {
            tick: 0,
            colonies: EntityStore::new(),
            creep_bases: EntityStore::new(),
            creeps: EntityStore::new(),
            resources: EntityStore::new(),
            rng: ChaCha12Rng::seed_from_u64(seed),
            stats: RunStats::default(),
        }
    }

    pub fn live_colonies(&self) -> usize {
        self.colonies.iter().filter(|(_, c)| c.is_alive()).count()
    }

    pub fn live_creep_bases(&self) -> usize {
        self.creep_bases.iter().filter(|(_, b)| b.is_alive()).count()
    }

    /// Nearest live colony, ties broken by lowest id
    pub fn nearest_live_colony(&self, from: Pos) -> Option<EntityId> {
        self.colonies
            .iter()
            .filter(|(_, c)| c.is_alive())
            .min_by_key(|(id, c)| (c.pos.distance(from), **id))
            .map(|(id, _)| *id)
    }

    /// Nearest live creep base, ties broken by lowest id
    pub fn nearest_live_creep_base(&self, from: Pos) -> Option<EntityId> {
        self.creep_bases
            .iter()
            .filter(|(_, b)| b.is_alive())
            .min_by_key(|(id, b)| (b.pos.distance(from), **id))
            .map(|(id, _)| *id)
    }

    /// Nearest resource node that still has something left
    pub fn nearest_resource(&self, from: Pos) -> Option<EntityId> {
        self.resources
            .iter()
            .filter(|(_, n)| !n.is_depleted())
            .min_by_key(|(id, n)| (n.pos.distance(from), **id))
            .map(|(id, _)| *id)
    }

    /// Live creeps within `radius` of `from`, nearest first
    pub fn creeps_near(&self, from: Pos, radius: u32) -> Vec<EntityId> {
        let mut near: Vec<(u32, EntityId)> = self
            .creeps
            .iter()
            .map(|(id, c)| (c.pos.distance(from), *id))
            .filter(|(d, _)| *d <= radius)
            .collect();
        near.sort_unstable();
        near.into_iter().map(|(_, id)| id).collect()
    }

    /// Verify the structural invariants a well-behaved tick preserves
    pub fn check_invariants(&self, config: &SimulationConfig) -> Result<()> {
        let fault = |detail: String| HarnessError::SimulationFault {
            tick: self.tick,
            detail,
        };

        for (id, colony) in self.colonies.iter() {
            if colony.resources < 0 {
                return Err(fault(format!("colony {} has negative resources", id)));
            }
            if colony.drones > config.content.max_drones {
                return Err(fault(format!(
                    "colony {} has {} drones (max {})",
                    id, colony.drones, config.content.max_drones
                )));
            }
            if !colony.pos.in_bounds(config.world_width, config.world_height) {
                return Err(fault(format!("colony {} left the grid at {}", id, colony.pos)));
            }
        }

        for (id, creep) in self.creeps.iter() {
            if !creep.pos.in_bounds(config.world_width, config.world_height) {
                return Err(fault(format!("creep {} left the grid at {}", id, creep.pos)));
            }
        }

        if self.creeps.len() > MAX_CREEPS {
            return Err(fault(format!(
                "{} live creeps exceeds the cap of {}",
                self.creeps.len(),
                MAX_CREEPS
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::ConfigBuilder;
    use crate::loader::BuiltinAssets;

    fn config() -> SimulationConfig {
        let assets = BuiltinAssets::new();
        let raw = serde_json::json!({"version": 1, "seed": 3});
        ConfigBuilder::new(&assets)
            .build(raw.as_object().unwrap())
            .unwrap()
    }

    #[test]
    fn test_nearest_lookups_break_ties_by_id() {
        let mut state = SimulationState::new(1);
        for pos in [Pos::new(5, 0), Pos::new(0, 5)] {
            let id = state.colonies.next_id();
            state.colonies.insert(id, Colony::new(id, pos, 100, 3));
        }

        // Both colonies are 5 cells away; the lower id wins
        assert_eq!(state.nearest_live_colony(Pos::new(0, 0)), Some(EntityId::new(0)));

        state.colonies.get_mut(EntityId::new(0)).unwrap().take_damage(500);
        assert_eq!(state.nearest_live_colony(Pos::new(0, 0)), Some(EntityId::new(1)));
        assert_eq!(state.live_colonies(), 1);
    }

    #[test]
    fn test_creeps_near_sorted_by_distance() {
        let mut state = SimulationState::new(1);
        for pos in [Pos::new(3, 3), Pos::new(1, 1), Pos::new(9, 9)] {
            let id = state.creeps.next_id();
            state.creeps.insert(id, Creep::new(id, pos, 5, 5));
        }
        let near = state.creeps_near(Pos::new(0, 0), 4);
        assert_eq!(near, vec![EntityId::new(1), EntityId::new(0)]);
    }

    #[test]
    fn test_invariant_violations_are_faults() {
        let config = config();
        let mut state = SimulationState::new(1);
        let id = state.colonies.next_id();
        state.colonies.insert(id, Colony::new(id, Pos::new(2, 2), 100, 3));
        assert!(state.check_invariants(&config).is_ok());

        state.colonies.get_mut(id).unwrap().resources = -1;
        assert!(matches!(
            state.check_invariants(&config),
            Err(HarnessError::SimulationFault { .. })
        ));
    }

    #[test]
    fn test_state_clone_is_independent() {
        let mut state = SimulationState::new(9);
        let id = state.colonies.next_id();
        state.colonies.insert(id, Colony::new(id, Pos::new(2, 2), 100, 3));

        let snapshot = state.clone();
        state.colonies.get_mut(id).unwrap().resources = 50;
        assert_eq!(snapshot.colonies.get(id).unwrap().resources, 0);
    }
}
