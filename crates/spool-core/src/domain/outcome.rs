//! Outcome of a single processor call.

use serde::{Deserialize, Serialize};

/// What a processor reports for one payload when it did not fail.
///
/// Failures are reported through `Err(ProcessError)` instead, so a processor
/// can use `?` on its own fallible steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessOutcome {
    /// Not ready yet (processed too recently, rate limited, ...).
    /// The item is dropped from the queue and does not count toward the batch.
    Skipped,

    /// Work done. Counts toward the batch quota.
    Succeeded,
}

impl ProcessOutcome {
    pub fn counts_toward_quota(self) -> bool {
        matches!(self, ProcessOutcome::Succeeded)
    }
}

impl From<bool> for ProcessOutcome {
    /// `true` = counted as processed, `false` = skipped.
    fn from(counted: bool) -> Self {
        if counted {
            ProcessOutcome::Succeeded
        } else {
            ProcessOutcome::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_as_screaming_snake_case() {
        let s = serde_json::to_string(&ProcessOutcome::Skipped).unwrap();
        assert_eq!(s, "\"SKIPPED\"");
        let s = serde_json::to_string(&ProcessOutcome::Succeeded).unwrap();
        assert_eq!(s, "\"SUCCEEDED\"");
    }

    #[test]
    fn bool_maps_to_quota_flag() {
        assert!(ProcessOutcome::from(true).counts_toward_quota());
        assert!(!ProcessOutcome::from(false).counts_toward_quota());
    }
}
