//! Replay payload and decoder
//!
//! The decoder only checks structure: required fields present, values of the
//! right JSON types, nothing trailing after the record. Checksum policy and
//! action ordering are validated later by the integrity gate and the
//! execution controller.

use crate::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// What a recorded action asks its colony to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Do nothing; still counts as a consumed action
    Noop,
    /// Start moving the colony toward a grid cell
    Relocate { x: i32, y: i32 },
    /// Change how drones split their work
    SetPriorities { gather: u8, build: u8, attack: u8 },
    /// Buy one drone now if affordable
    BuildDrone,
}

/// A single recorded player intent
///
/// `tick` is signed so that a negative tick still decodes; the controller
/// then rejects it as a corrupt stream rather than the decoder rejecting it as
/// malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub tick: i64,
    pub actor: u32,
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl ActionEvent {
    pub fn new(tick: i64, actor: u32, kind: ActionKind) -> Self {
        ActionEvent { tick, actor, kind }
    }

    pub fn noop(tick: i64, actor: u32) -> Self {
        Self::new(tick, actor, ActionKind::Noop)
    }
}

/// A decoded replay
///
/// Immutable once decoded. Extra envelope fields (game version, a client's
/// claimed result, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayPayload {
    /// Opaque, versioned level configuration
    pub config: serde_json::Map<String, serde_json::Value>,
    /// Level generator checksum; zero means "not computed"
    pub level_gen_checksum: i64,
    /// Recorded actions in recorded order
    pub actions: Vec<ActionEvent>,
}

/// Decode a replay from raw bytes
///
/// Consumes the entire buffer: trailing non-whitespace after the record is an
/// error, as is any structural problem.
pub fn decode(bytes: &[u8]) -> Result<ReplayPayload> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(HarnessError::Decode("empty input".to_string()));
    }
    serde_json::from_slice(bytes).map_err(|e| HarnessError::Decode(e.to_string()))
}

/// Read a whole replay from `reader` without interpreting it
pub fn read_replay<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}
