//! Deterministic configuration builder
//!
//! Turns the opaque, versioned configuration object carried by a replay into a
//! finalized [`SimulationConfig`]. Every default and derived value is resolved
//! here exactly once; the execution controller only ever reads the result.
//!
//! The builder is a pure function of its input and the (static) asset loader:
//! it never looks at the clock, an ambient RNG or any process-global state.

use crate::core::ContentName;
use crate::loader::{AssetLoader, ContentPack};
use crate::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Oldest configuration version this build accepts
pub const MIN_CONFIG_VERSION: u32 = 1;
/// Newest configuration version this build accepts
///
/// Version 2 added `tick_rate`; version 1 configurations always run at 60 Hz.
pub const CURRENT_CONFIG_VERSION: u32 = 2;

/// Tick rate for configurations that do not set one
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Default in-game length limit, in seconds of simulated time
pub const DEFAULT_GAME_SECONDS: u64 = 20 * 60;

/// Typed view of a replay's configuration object
///
/// Optional fields are resolved to defaults by [`ConfigBuilder`]. Unknown
/// fields are rejected: a field this version does not define means the
/// client and the harness disagree about the format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLevelConfig {
    pub version: u32,
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_size: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colonies: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_drones: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creep_bases: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creep_difficulty: Option<u8>,
    #[serde(default)]
    pub endless: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_rate: Option<u32>,
}

/// How a run can be won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryCondition {
    /// Destroy every creep base
    DestroyCreepBases,
    /// Endless mode: the run can only end in defeat
    None,
}

/// Finalized, execution-ready configuration
///
/// Immutable once built. The execution controller holds it behind an `Arc`
/// and never re-derives any of these values mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub version: u32,
    pub seed: u64,
    pub content: ContentPack,

    pub world_width: u32,
    pub world_height: u32,
    pub resource_nodes: u32,
    pub colonies: u32,
    pub starting_drones: u32,
    pub creep_bases: u32,
    pub creep_difficulty: u8,

    /// Creep hit points after difficulty scaling
    pub creep_hp: i32,
    /// Ticks between spawns of one creep base, before jitter
    pub creep_spawn_interval: u32,

    pub tick_rate: u32,
    /// Logical time per tick; never derived from the wall clock
    pub fixed_delta: Duration,
    /// Ticks between colony work cycles
    pub work_interval: u32,
    /// Ticks between relocation steps
    pub move_interval: u32,
    /// Ticks between creep steps
    pub creep_move_interval: u32,
    /// Attackers engage creeps within this many cells before targeting bases
    pub defense_radius: u32,

    pub victory: VictoryCondition,
    /// `None` means the run has no in-game length limit
    pub max_ticks: Option<u64>,
}

impl SimulationConfig {
    /// Simulated milliseconds elapsed after `ticks` ticks
    pub fn game_time_ms(&self, ticks: u64) -> u64 {
        ticks.saturating_mul(self.fixed_delta.as_micros() as u64) / 1000
    }
}

/// Builds [`SimulationConfig`] values against a content source
pub struct ConfigBuilder<'a> {
    assets: &'a dyn AssetLoader,
}

impl<'a> ConfigBuilder<'a> {
    pub fn new(assets: &'a dyn AssetLoader) -> Self {
        ConfigBuilder { assets }
    }

    /// Parse and finalize a raw configuration object
    pub fn build(&self, raw: &serde_json::Map<String, serde_json::Value>) -> Result<SimulationConfig> {
        let raw: RawLevelConfig =
            serde_json::from_value(serde_json::Value::Object(raw.clone()))
                .map_err(|e| HarnessError::ConfigInvalid(e.to_string()))?;
        self.finalize(&raw)
    }

    /// Resolve every default and derived field of an already-typed config
    pub fn finalize(&self, raw: &RawLevelConfig) -> Result<SimulationConfig> {
        let version = check_range(
            "version",
            raw.version,
            MIN_CONFIG_VERSION..=CURRENT_CONFIG_VERSION,
        )?;

        let content_name = raw
            .content
            .as_deref()
            .map(ContentName::from)
            .unwrap_or_default();
        let content = self.assets.load_pack(&content_name).ok_or_else(|| {
            HarnessError::ConfigInvalid(format!(
                "unknown content pack '{}' (available: {})",
                content_name,
                self.assets.pack_names().join(", ")
            ))
        })?;

        let tick_rate = match (version, raw.tick_rate) {
            (1, Some(_)) => {
                return Err(HarnessError::ConfigInvalid(
                    "tick_rate requires config version 2".to_string(),
                ))
            }
            (_, Some(rate)) => check_range("tick_rate", rate, 10..=240)?,
            (_, None) => DEFAULT_TICK_RATE,
        };

        let world_size = check_range("world_size", raw.world_size.unwrap_or(1), 0..=3)? as u32;
        let resources = check_range("resources", raw.resources.unwrap_or(2), 0..=4)? as u32;
        let colonies = check_range("colonies", raw.colonies.unwrap_or(1), 1..=4)? as u32;
        let starting_drones = check_range(
            "starting_drones",
            raw.starting_drones.unwrap_or(5),
            1..=content.max_drones,
        )?;
        let creep_bases = check_range("creep_bases", raw.creep_bases.unwrap_or(2), 0..=6)? as u32;
        let creep_difficulty = check_range("creep_difficulty", raw.creep_difficulty.unwrap_or(1), 0..=4)?;

        let (victory, max_ticks) = if raw.endless {
            if raw.max_ticks.is_some() {
                return Err(HarnessError::ConfigInvalid(
                    "max_ticks cannot be combined with endless mode".to_string(),
                ));
            }
            (VictoryCondition::None, None)
        } else {
            let default_limit = tick_rate as u64 * DEFAULT_GAME_SECONDS;
            let limit = raw.max_ticks.unwrap_or(default_limit);
            if limit == 0 {
                return Err(HarnessError::ConfigInvalid(
                    "max_ticks must be at least 1".to_string(),
                ));
            }
            (VictoryCondition::DestroyCreepBases, Some(limit))
        };

        let side = 24 + 8 * world_size;
        let difficulty = creep_difficulty as u32;

        Ok(SimulationConfig {
            version,
            seed: raw.seed,
            creep_hp: content.creep_hp * (1 + difficulty as i32),
            content,
            world_width: side,
            world_height: side,
            resource_nodes: 4 + 3 * resources,
            colonies,
            starting_drones,
            creep_bases,
            creep_difficulty,
            creep_spawn_interval: tick_rate * (6 - difficulty),
            tick_rate,
            fixed_delta: Duration::from_micros(1_000_000 / tick_rate as u64),
            work_interval: (tick_rate / 4).max(1),
            move_interval: (tick_rate / 2).max(1),
            creep_move_interval: (tick_rate / 4).max(1),
            defense_radius: 4,
            victory,
            max_ticks,
        })
    }
}

fn check_range<T>(field: &str, value: T, range: RangeInclusive<T>) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(HarnessError::ConfigInvalid(format!(
            "{} = {} is outside {}..={}",
            field,
            value,
            range.start(),
            range.end()
        )))
    }
}
