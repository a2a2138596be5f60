//! Player colony representation
//!
//! A colony is the actor a player controls. Every recorded action names the
//! colony it targets by its actor ID.

use crate::core::{EntityId, Pos, SimEntity};
use serde::{Deserialize, Serialize};

/// Drone work split, as relative weights
///
/// Each weight is in `0..=MAX_WEIGHT`. Drones are divided between gathering,
/// building and attacking in proportion to the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priorities {
    pub gather: u8,
    pub build: u8,
    pub attack: u8,
}

impl Priorities {
    pub const MAX_WEIGHT: u8 = 10;

    pub fn new(gather: u8, build: u8, attack: u8) -> Self {
        Priorities {
            gather,
            build,
            attack,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.gather <= Self::MAX_WEIGHT
            && self.build <= Self::MAX_WEIGHT
            && self.attack <= Self::MAX_WEIGHT
    }

    pub fn total(&self) -> u32 {
        self.gather as u32 + self.build as u32 + self.attack as u32
    }

    /// Split `drones` into (gatherers, builders, attackers)
    ///
    /// Rounding remainders go to builders when building has any weight at all,
    /// otherwise they idle.
    pub fn split(&self, drones: u32) -> (u32, u32, u32) {
        let total = self.total();
        if total == 0 {
            return (0, 0, 0);
        }
        let gatherers = drones * self.gather as u32 / total;
        let attackers = drones * self.attack as u32 / total;
        let builders = if self.build > 0 {
            drones - gatherers - attackers
        } else {
            0
        };
        (gatherers, builders, attackers)
    }
}

impl Default for Priorities {
    fn default() -> Self {
        Priorities::new(4, 3, 3)
    }
}

/// A player-controlled colony
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    /// Actor ID referenced by replay actions
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// Current grid cell
    pub pos: Pos,

    /// Hit points; the colony is destroyed at zero
    pub hp: i32,

    /// Stored resources
    pub resources: i64,

    /// Number of worker drones
    pub drones: u32,

    /// How drones split their work
    pub priorities: Priorities,

    /// Cell the colony is relocating to, if any
    pub relocation_target: Option<Pos>,

    /// Set once hp reaches zero; never cleared
    pub destroyed: bool,
}

impl Colony {
    pub fn new(id: EntityId, pos: Pos, hp: i32, drones: u32) -> Self {
        Colony {
            id,
            name: format!("Colony {}", id),
            pos,
            hp,
            resources: 0,
            drones,
            priorities: Priorities::default(),
            relocation_target: None,
            destroyed: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.destroyed
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
        if self.hp <= 0 {
            self.hp = 0;
            self.destroyed = true;
            self.drones = 0;
            self.relocation_target = None;
        }
    }

    /// Spend `cost` resources if the colony can afford it
    pub fn try_spend(&mut self, cost: i64) -> bool {
        if self.resources >= cost {
            self.resources -= cost;
            true
        } else {
            false
        }
    }
}

impl SimEntity for Colony {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
