//! One fixed-delta step of the colony simulation
//!
//! Phases run in a fixed order every tick (relocation, work, spawning, creep
//! movement) and each phase walks its entities in id order. Arithmetic is
//! integer-only; the only randomness is the state's own RNG.

use crate::core::{Creep, EntityId};
use crate::game::config::SimulationConfig;
use crate::game::state::{SimulationState, MAX_CREEPS};
use crate::{HarnessError, Result};
use rand::Rng;
use smallvec::SmallVec;

/// Notable things that happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub colonies_destroyed: SmallVec<[EntityId; 2]>,
    pub creep_bases_destroyed: SmallVec<[EntityId; 2]>,
    pub creeps_spawned: u32,
    pub creeps_killed: u32,
    pub drones_built: u32,
}

/// Advance the simulation by exactly one tick
pub fn advance(state: &mut SimulationState, config: &SimulationConfig) -> Result<TickEvents> {
    let tick = state.tick;
    let mut events = TickEvents::default();

    if tick % config.move_interval as u64 == 0 {
        relocate_colonies(state);
    }
    if tick % config.work_interval as u64 == 0 {
        work_cycle(state, config, &mut events)?;
    }
    spawn_creeps(state, config, &mut events);
    if tick % config.creep_move_interval as u64 == 0 {
        move_creeps(state, &mut events);
    }

    state.tick += 1;
    Ok(events)
}

fn relocate_colonies(state: &mut SimulationState) {
    for (_, colony) in state.colonies.iter_mut() {
        if !colony.is_alive() {
            continue;
        }
        if let Some(target) = colony.relocation_target {
            colony.pos = colony.pos.step_toward(target);
            if colony.pos == target {
                colony.relocation_target = None;
            }
        }
    }
}

fn work_cycle(
    state: &mut SimulationState,
    config: &SimulationConfig,
    events: &mut TickEvents,
) -> Result<()> {
    let pack = &config.content;

    for id in state.colonies.ids() {
        let colony = state.colonies.get(id)?;
        if !colony.is_alive() {
            continue;
        }
        let pos = colony.pos;
        let (gatherers, builders, attackers) = colony.priorities.split(colony.drones);

        // Gather from the nearest node; yield falls off with distance
        if gatherers > 0 {
            if let Some(node_id) = state.nearest_resource(pos) {
                let node = state.resources.get_mut(node_id)?;
                let dist = node.pos.distance(pos) as i64;
                let wanted = (gatherers as i64 * pack.drone_harvest * 8 / (8 + dist)).max(1);
                let taken = node.harvest(wanted);

                let colony = state.colonies.get_mut(id)?;
                colony.resources = colony.resources.checked_add(taken).ok_or_else(|| {
                    HarnessError::SimulationFault {
                        tick: state.tick,
                        detail: format!("resource overflow in colony {}", id),
                    }
                })?;
                state.stats.resources_gathered += taken;
            }
        }

        // At most one drone per work cycle
        if builders > 0 {
            let colony = state.colonies.get_mut(id)?;
            if colony.drones < pack.max_drones && colony.try_spend(pack.drone_cost) {
                colony.drones += 1;
                state.stats.drones_built += 1;
                events.drones_built += 1;
            }
        }

        if attackers > 0 {
            let mut pool = attackers as i64 * pack.drone_damage;

            for creep_id in state.creeps_near(pos, config.defense_radius) {
                if pool == 0 {
                    break;
                }
                let creep = state.creeps.get_mut(creep_id)?;
                pool -= creep.absorb(pool);
                if !creep.is_alive() {
                    state.creeps.remove(creep_id);
                    state.stats.creeps_killed += 1;
                    events.creeps_killed += 1;
                }
            }

            if pool > 0 {
                if let Some(base_id) = state.nearest_live_creep_base(pos) {
                    let base = state.creep_bases.get_mut(base_id)?;
                    base.absorb(pool);
                    if !base.is_alive() {
                        state.stats.creep_bases_destroyed += 1;
                        events.creep_bases_destroyed.push(base_id);
                    }
                }
            }
        }
    }

    Ok(())
}

fn spawn_creeps(state: &mut SimulationState, config: &SimulationConfig, events: &mut TickEvents) {
    let jitter_range = (config.tick_rate / 2).max(1);

    for id in state.creep_bases.ids() {
        let Ok(base) = state.creep_bases.get_mut(id) else {
            continue;
        };
        if !base.is_alive() {
            continue;
        }
        if base.spawn_cooldown > 0 {
            base.spawn_cooldown -= 1;
            continue;
        }

        let pos = base.pos;
        let extra_hp = state.rng.gen_range(0..=config.creep_difficulty) as i32;
        let cooldown = config.creep_spawn_interval + state.rng.gen_range(0..jitter_range);
        if let Ok(base) = state.creep_bases.get_mut(id) {
            base.spawn_cooldown = cooldown;
        }

        // Spawning pauses at the cap rather than faulting the run
        if state.creeps.len() >= MAX_CREEPS {
            continue;
        }
        let creep_id = state.creeps.next_id();
        state.creeps.insert(
            creep_id,
            Creep::new(
                creep_id,
                pos,
                config.creep_hp + extra_hp,
                config.content.creep_damage,
            ),
        );
        state.stats.creeps_spawned += 1;
        events.creeps_spawned += 1;
    }
}

fn move_creeps(state: &mut SimulationState, events: &mut TickEvents) {
    for creep_id in state.creeps.ids() {
        let Ok(creep) = state.creeps.get(creep_id) else {
            continue;
        };
        let Some(target_id) = state.nearest_live_colony(creep.pos) else {
            // Nothing left to attack
            return;
        };
        let Ok(target) = state.colonies.get(target_id) else {
            continue;
        };
        let target_pos = target.pos;
        let damage = creep.damage;
        let next = creep.pos.step_toward(target_pos);

        if next != target_pos {
            if let Ok(creep) = state.creeps.get_mut(creep_id) {
                creep.pos = next;
            }
            continue;
        }

        // Arrived: hit the colony and despawn
        state.creeps.remove(creep_id);
        if let Ok(colony) = state.colonies.get_mut(target_id) {
            colony.take_damage(damage);
            state.stats.damage_taken += damage as i64;
            if !colony.is_alive() {
                state.stats.colonies_lost += 1;
                events.colonies_destroyed.push(target_id);
            }
        }
    }
}
