//! World initialization from a finalized configuration
//!
//! Plays the level generator's part: lays out colonies, creep bases and
//! resource nodes on the grid. Everything is drawn from the state's own RNG,
//! seeded from the configuration, so the same config always yields the same
//! world.

use crate::core::{Colony, CreepBase, Pos, ResourceNode};
use crate::game::config::SimulationConfig;
use crate::game::state::SimulationState;
use crate::{HarnessError, Result};
use rand::Rng;
use rustc_hash::FxHashSet;
use std::ops::Range;

/// Placement attempts per entity before giving up
const MAX_PLACEMENT_ATTEMPTS: u32 = 256;

/// Builds the initial [`SimulationState`] for a configuration
pub struct WorldInitializer<'a> {
    config: &'a SimulationConfig,
}

impl<'a> WorldInitializer<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        WorldInitializer { config }
    }

    /// Create the tick-0 state
    ///
    /// Colonies are placed in the left third of the grid and creep bases in
    /// the right third; resource nodes may land anywhere. No two entities share
    /// a cell.
    pub fn init_state(&self) -> Result<SimulationState> {
        let config = self.config;
        let pack = &config.content;
        let mut state = SimulationState::new(config.seed);
        let mut occupied = FxHashSet::default();

        let width = config.world_width as i32;
        let height = config.world_height as i32;
        let third = width / 3;

        for _ in 0..config.colonies {
            let pos = place(&mut state, &mut occupied, 0..third, 0..height)?;
            let id = state.colonies.next_id();
            state
                .colonies
                .insert(id, Colony::new(id, pos, pack.colony_hp, config.starting_drones));
        }

        for _ in 0..config.creep_bases {
            let pos = place(&mut state, &mut occupied, width - third..width, 0..height)?;
            let jitter = state.rng.gen_range(0..config.tick_rate);
            let id = state.creep_bases.next_id();
            state.creep_bases.insert(
                id,
                CreepBase::new(id, pos, pack.creep_base_hp, config.creep_spawn_interval + jitter),
            );
        }

        for _ in 0..config.resource_nodes {
            let pos = place(&mut state, &mut occupied, 0..width, 0..height)?;
            let id = state.resources.next_id();
            state
                .resources
                .insert(id, ResourceNode::new(id, pos, pack.resource_amount));
        }

        Ok(state)
    }
}

fn place(
    state: &mut SimulationState,
    occupied: &mut FxHashSet<Pos>,
    xs: Range<i32>,
    ys: Range<i32>,
) -> Result<Pos> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = Pos::new(
            state.rng.gen_range(xs.clone()),
            state.rng.gen_range(ys.clone()),
        );
        if occupied.insert(pos) {
            return Ok(pos);
        }
    }
    Err(HarnessError::SimulationFault {
        tick: 0,
        detail: format!(
            "no free cell in x {}..{}, y {}..{}",
            xs.start, xs.end, ys.start, ys.end
        ),
    })
}
