//! Static content served to the configuration builder
//!
//! A replay's configuration names a content pack; the pack supplies the unit
//! statistics the simulation needs. Packs are compiled in, so resolving one
//! never touches the filesystem and a run stays free of I/O.

use crate::core::ContentName;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Unit statistics for one content pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPack {
    pub name: ContentName,
    /// Starting (and maximum) colony hit points
    pub colony_hp: i32,
    /// Upper bound on drones per colony
    pub max_drones: u32,
    /// Resources spent per drone
    pub drone_cost: i64,
    /// Resources one gatherer brings back per work cycle at distance zero
    pub drone_harvest: i64,
    /// Damage one attacker deals per work cycle
    pub drone_damage: i64,
    pub creep_base_hp: i32,
    /// Creep hit points at difficulty zero
    pub creep_hp: i32,
    pub creep_damage: i32,
    /// Resources in a freshly generated node
    pub resource_amount: i64,
}

/// Source of static content referenced by a configuration
pub trait AssetLoader: Send + Sync {
    /// Look up a content pack by name
    fn load_pack(&self, name: &ContentName) -> Option<ContentPack>;

    /// Names of every pack this loader can serve, sorted
    fn pack_names(&self) -> Vec<String>;
}

/// Loader backed by the packs compiled into the binary
#[derive(Debug, Clone)]
pub struct BuiltinAssets {
    packs: FxHashMap<String, ContentPack>,
}

impl BuiltinAssets {
    pub fn new() -> Self {
        let mut packs = FxHashMap::default();
        for pack in [Self::standard(), Self::hardened()] {
            packs.insert(pack.name.as_str().to_string(), pack);
        }
        BuiltinAssets { packs }
    }

    fn standard() -> ContentPack {
        ContentPack {
            name: ContentName::new("standard"),
            colony_hp: 200,
            max_drones: 60,
            drone_cost: 20,
            drone_harvest: 3,
            drone_damage: 2,
            creep_base_hp: 400,
            creep_hp: 6,
            creep_damage: 10,
            resource_amount: 300,
        }
    }

    fn hardened() -> ContentPack {
        ContentPack {
            name: ContentName::new("hardened"),
            colony_hp: 150,
            max_drones: 40,
            drone_cost: 25,
            drone_harvest: 3,
            drone_damage: 2,
            creep_base_hp: 700,
            creep_hp: 12,
            creep_damage: 15,
            resource_amount: 250,
        }
    }
}

impl Default for BuiltinAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader for BuiltinAssets {
    fn load_pack(&self, name: &ContentName) -> Option<ContentPack> {
        self.packs.get(name.as_str()).cloned()
    }

    fn pack_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.packs.keys().cloned().collect();
        names.sort();
        names
    }
}
