//! Queue item: payload + retry counter.

use serde::{Deserialize, Serialize};

/// One unit of work in a [`WorkQueue`](crate::ports::WorkQueue).
///
/// `payload` is opaque to the drainer (a user name, `anime:1535`, ...).
/// `attempts` is only touched by the drain loop on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub payload: String,

    #[serde(default)]
    pub attempts: u32,
}

impl QueueItem {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            attempts: 0,
        }
    }

    pub fn with_attempts(payload: impl Into<String>, attempts: u32) -> Self {
        Self {
            payload: payload.into(),
            attempts,
        }
    }

    /// Apply the retry placement rule after a failed attempt.
    ///
    /// Returns `true` when the item should go back to the front of the queue.
    /// - `attempts < max_attempts`: bump the counter, retry soon (front)
    /// - otherwise: reset the counter, let other items go first (back)
    pub fn record_failure(&mut self, max_attempts: u32) -> bool {
        if self.attempts < max_attempts {
            self.attempts += 1;
            true
        } else {
            self.attempts = 0;
            false
        }
    }
}
