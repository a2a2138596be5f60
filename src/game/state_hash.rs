//! Deterministic state hashing
//!
//! Hashes the canonical JSON form of [`SimulationState`]. The hash appears in
//! run results and tick traces, so it must not depend on the process, the
//! pointer width or the byte order of the host. The bytes are folded Fx-style
//! into a `u64`, eight little-endian bytes at a time.

use crate::game::state::SimulationState;
use serde::{Deserialize, Serialize};

/// Multiplier of the Fx hash family
const FX_SEED: u64 = 0x51_7c_c1_b7_27_22_0a_95;

/// Fields that do not affect how the simulation evolves
///
/// `stats` is reported separately in the result; two states that differ only
/// in their counters will still evolve identically.
const EXCLUDED_FIELDS: &[&str] = &["stats"];

/// One trace entry: the state hash after `tick` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickHash {
    pub tick: u64,
    #[serde(with = "hex_hash")]
    pub hash: u64,
}

/// Compute a deterministic hash of simulation state
///
/// Entity stores are `BTreeMap`s and struct fields serialize in declaration
/// order, so the JSON text is canonical without any sorting here.
pub fn compute_state_hash(state: &SimulationState) -> u64 {
    let mut value = match serde_json::to_value(state) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(target: "runsim", "failed to serialize state for hashing: {}", e);
            return 0;
        }
    };

    if let serde_json::Value::Object(map) = &mut value {
        for field in EXCLUDED_FIELDS {
            map.remove(*field);
        }
    }

    stable_hash(value.to_string().as_bytes())
}

/// Fixed-width Fx fold over `bytes`; identical on every target
pub fn stable_hash(bytes: &[u8]) -> u64 {
    let mut hash = 0u64;
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        hash = fx_step(hash, u64::from_le_bytes(word));
    }
    // Length last, so zero padding cannot collide with real zero bytes
    fx_step(hash, bytes.len() as u64)
}

#[inline]
fn fx_step(hash: u64, word: u64) -> u64 {
    (hash.rotate_left(5) ^ word).wrapping_mul(FX_SEED)
}

/// Format a hash as 16 hex digits
pub fn format_hash(hash: u64) -> String {
    format!("{:016x}", hash)
}

mod hex_hash {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &u64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_hash(*hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let text = String::deserialize(d)?;
        u64::from_str_radix(&text, 16).map_err(serde::de::Error::custom)
    }
}
