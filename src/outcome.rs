//! Run outcomes and the result encoder
//!
//! Every run, successful or not, ends as exactly one [`RunOutcome`], encoded
//! as a single JSON object tagged by `status`.

use crate::game::SimResult;
use crate::replay::RejectReason;
use crate::{HarnessError, Result};
use serde::{Deserialize, Serialize};

/// Machine-readable category of an internal error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalErrorKind {
    /// The recorded actions do not fit this simulation
    ActionStreamCorrupt,
    /// The simulation broke one of its own invariants
    SimulationFault,
    /// Parallel replicas of one run disagreed
    Nondeterministic,
    /// The simulation thread panicked
    Panic,
    /// Anything else
    Internal,
}

/// Final outcome of one harness run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed {
        result: SimResult,
    },
    TimedOut {
        timeout_secs: f64,
    },
    IntegrityRejected {
        reason: RejectReason,
        message: String,
    },
    InternalError {
        kind: InternalErrorKind,
        detail: String,
    },
    DecodeError {
        detail: String,
    },
    ConfigInvalid {
        detail: String,
    },
}

impl RunOutcome {
    /// Map a pipeline error to its outcome
    ///
    /// This is the only place errors become outcomes.
    pub fn from_error(err: HarnessError) -> Self {
        let internal = |kind: InternalErrorKind, err: &HarnessError| RunOutcome::InternalError {
            kind,
            detail: err.to_string(),
        };

        match err {
            HarnessError::Decode(detail) => RunOutcome::DecodeError { detail },
            HarnessError::ConfigInvalid(detail) => RunOutcome::ConfigInvalid { detail },
            HarnessError::ActionStreamCorrupt { .. } => {
                internal(InternalErrorKind::ActionStreamCorrupt, &err)
            }
            HarnessError::SimulationFault { .. } | HarnessError::EntityNotFound(_) => {
                internal(InternalErrorKind::SimulationFault, &err)
            }
            HarnessError::Nondeterministic(_) => internal(InternalErrorKind::Nondeterministic, &err),
            HarnessError::Cancelled(_)
            | HarnessError::IoError(_)
            | HarnessError::SerializationError(_)
            | HarnessError::JoinError(_) => internal(InternalErrorKind::Internal, &err),
        }
    }

    /// The `status` tag
    pub fn kind(&self) -> &'static str {
        match self {
            RunOutcome::Completed { .. } => "completed",
            RunOutcome::TimedOut { .. } => "timed_out",
            RunOutcome::IntegrityRejected { .. } => "integrity_rejected",
            RunOutcome::InternalError { .. } => "internal_error",
            RunOutcome::DecodeError { .. } => "decode_error",
            RunOutcome::ConfigInvalid { .. } => "config_invalid",
        }
    }

    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Completed { .. } => 0,
            RunOutcome::InternalError { .. } => 1,
            RunOutcome::DecodeError { .. } => 2,
            RunOutcome::ConfigInvalid { .. } => 3,
            RunOutcome::IntegrityRejected { .. } => 4,
            RunOutcome::TimedOut { .. } => 5,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }

    /// The simulation result, if the run completed
    pub fn result(&self) -> Option<&SimResult> {
        match self {
            RunOutcome::Completed { result } => Some(result),
            _ => None,
        }
    }
}

/// Encode an outcome as one line of JSON (without the trailing newline)
pub fn encode(outcome: &RunOutcome) -> Result<Vec<u8>> {
    serde_json::to_vec(outcome).map_err(|e| HarnessError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn encoded(outcome: &RunOutcome) -> Value {
        serde_json::from_slice(&encode(outcome).unwrap()).unwrap()
    }

    #[test]
    fn test_status_tags() {
        assert_eq!(
            encoded(&RunOutcome::TimedOut { timeout_secs: 1.0 }),
            json!({"status": "timed_out", "timeout_secs": 1.0})
        );
        assert_eq!(
            encoded(&RunOutcome::IntegrityRejected {
                reason: RejectReason::ZeroLevelGenChecksum,
                message: "zero".to_string(),
            }),
            json!({"status": "integrity_rejected", "reason": "zero_level_gen_checksum", "message": "zero"})
        );
        assert_eq!(
            encoded(&RunOutcome::DecodeError {
                detail: "eof".to_string()
            }),
            json!({"status": "decode_error", "detail": "eof"})
        );
    }

    #[test]
    fn test_corruption_is_an_internal_error() {
        let outcome = RunOutcome::from_error(HarnessError::ActionStreamCorrupt {
            tick: 0,
            detail: "tick -1".to_string(),
        });
        assert_eq!(outcome.kind(), "internal_error");
        assert_eq!(outcome.exit_code(), 1);

        let value = encoded(&outcome);
        assert_eq!(value["kind"], "action_stream_corrupt");
        assert!(value["detail"].as_str().unwrap().contains("tick -1"));
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            RunOutcome::from_error(HarnessError::Decode("x".into())).kind(),
            "decode_error"
        );
        assert_eq!(
            RunOutcome::from_error(HarnessError::ConfigInvalid("x".into())).kind(),
            "config_invalid"
        );
        match RunOutcome::from_error(HarnessError::Nondeterministic("x".into())) {
            RunOutcome::InternalError { kind, .. } => {
                assert_eq!(kind, InternalErrorKind::Nondeterministic)
            }
            other => panic!("unexpected {other:?}"),
        }
        match RunOutcome::from_error(HarnessError::EntityNotFound(3)) {
            RunOutcome::InternalError { kind, .. } => {
                assert_eq!(kind, InternalErrorKind::SimulationFault)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let outcomes = [
            RunOutcome::TimedOut { timeout_secs: 1.0 },
            RunOutcome::IntegrityRejected {
                reason: RejectReason::ZeroLevelGenChecksum,
                message: String::new(),
            },
            RunOutcome::InternalError {
                kind: InternalErrorKind::Panic,
                detail: String::new(),
            },
            RunOutcome::DecodeError {
                detail: String::new(),
            },
            RunOutcome::ConfigInvalid {
                detail: String::new(),
            },
        ];
        let mut codes: Vec<u8> = outcomes.iter().map(|o| o.exit_code()).collect();
        codes.push(0);
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
        assert!(outcomes.iter().all(|o| !o.is_completed() && o.result().is_none()));
    }

    #[test]
    fn test_encoding_is_single_line() {
        let outcome = RunOutcome::ConfigInvalid {
            detail: "line one\nline two".to_string(),
        };
        let bytes = encode(&outcome).unwrap();
        assert!(!bytes.contains(&b'\n'));
    }
}
