//! Hostile entities: creep bases and the creeps they spawn

use crate::core::{EntityId, Pos, SimEntity};
use serde::{Deserialize, Serialize};

/// A stationary creep spawner
///
/// Destroying every creep base is the victory condition of a non-endless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreepBase {
    pub id: EntityId,
    pub name: String,
    pub pos: Pos,
    pub hp: i32,
    /// Ticks until the next spawn
    pub spawn_cooldown: u32,
}

impl CreepBase {
    pub fn new(id: EntityId, pos: Pos, hp: i32, spawn_cooldown: u32) -> Self {
        CreepBase {
            id,
            name: format!("Creep base {}", id),
            pos,
            hp,
            spawn_cooldown,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage, returning how much was absorbed
    pub fn absorb(&mut self, damage: i64) -> i64 {
        let absorbed = damage.min(self.hp as i64);
        self.hp -= absorbed as i32;
        absorbed
    }
}

impl SimEntity for CreepBase {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A mobile creep walking toward the nearest colony
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creep {
    pub id: EntityId,
    pub pos: Pos,
    pub hp: i32,
    /// Damage dealt to the colony it reaches
    pub damage: i32,
}

impl Creep {
    pub fn new(id: EntityId, pos: Pos, hp: i32, damage: i32) -> Self {
        Creep { id, pos, hp, damage }
    }

    /// Apply damage, returning how much was absorbed
    pub fn absorb(&mut self, damage: i64) -> i64 {
        let absorbed = damage.min(self.hp as i64);
        self.hp -= absorbed as i32;
        absorbed
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}
