//! Replay input: decoding and integrity gating

pub mod gate;
pub mod payload;

pub use gate::{IntegrityGate, RejectReason, Verdict};
pub use payload::{decode, read_replay, ActionEvent, ActionKind, ReplayPayload};
