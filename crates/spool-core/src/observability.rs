use serde::{Deserialize, Serialize};

/// Counters for one drain of one queue.
///
/// `processed` is the batch quota counter; everything else is informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    pub processed: usize,
    pub skipped: usize,
    /// Failures put back at the front with attempts + 1.
    pub retried: usize,
    /// Failures put back at the end with attempts reset.
    pub recycled: usize,
    pub rejected: usize,
}

impl DrainReport {
    pub fn failures(&self) -> usize {
        self.retried + self.recycled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueReport {
    pub queue: String,
    #[serde(flatten)]
    pub report: DrainReport,
    /// Items left in the queue after the drain.
    pub remaining: usize,
}
