//! Integrity gate
//!
//! Runs before any simulation work. A zero level-generation checksum means the
//! client never computed one, which is what a forged or hand-built replay
//! looks like, so it is rejected unless the caller explicitly trusts the input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a replay was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The level-generation checksum is the zero sentinel
    ZeroLevelGenChecksum,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ZeroLevelGenChecksum => write!(f, "replay has a zero levelgen checksum"),
        }
    }
}

/// Gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Reject(RejectReason),
}

/// Checksum policy for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityGate {
    trust_override: bool,
}

impl IntegrityGate {
    /// `trust_override` lets zero checksums through; testing use only
    pub fn new(trust_override: bool) -> Self {
        IntegrityGate { trust_override }
    }

    pub fn check(&self, checksum: i64) -> Verdict {
        check(checksum, self.trust_override)
    }
}

/// Apply the checksum policy
///
/// The checksum is not recomputed here; only the level generator can do that.
pub fn check(checksum: i64, trust_override: bool) -> Verdict {
    if checksum == 0 && !trust_override {
        Verdict::Reject(RejectReason::ZeroLevelGenChecksum)
    } else {
        Verdict::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_checksum_rejected_without_override() {
        assert_eq!(
            check(0, false),
            Verdict::Reject(RejectReason::ZeroLevelGenChecksum)
        );
        assert_eq!(
            IntegrityGate::default().check(0),
            Verdict::Reject(RejectReason::ZeroLevelGenChecksum)
        );
    }

    #[test]
    fn test_zero_checksum_allowed_with_override() {
        assert_eq!(check(0, true), Verdict::Allow);
        assert_eq!(IntegrityGate::new(true).check(0), Verdict::Allow);
    }

    #[test]
    fn test_nonzero_checksums_pass() {
        for checksum in [1, -1, 12345, i64::MAX, i64::MIN] {
            assert_eq!(check(checksum, false), Verdict::Allow);
            assert_eq!(check(checksum, true), Verdict::Allow);
        }
    }

    #[test]
    fn test_reason_wire_name() {
        let encoded = serde_json::to_string(&RejectReason::ZeroLevelGenChecksum).unwrap();
        assert_eq!(encoded, "\"zero_level_gen_checksum\"");
    }
}
