//! ProcessedLog implementations.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::json_file;
use crate::ports::{ProcessedLog, QueueError};

#[derive(Debug, Default)]
pub struct InMemoryProcessedLog {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryProcessedLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProcessedLog for InMemoryProcessedLog {
    async fn last_processed(&self, payload: &str) -> Result<Option<DateTime<Utc>>, QueueError> {
        Ok(self.entries.lock().await.get(payload).copied())
    }

    async fn record(&self, payload: &str, at: DateTime<Utc>) -> Result<(), QueueError> {
        self.entries.lock().await.insert(payload.to_string(), at);
        Ok(())
    }
}

/// JSON object `{payload: rfc3339 timestamp}` on disk.
pub struct FileProcessedLog {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, DateTime<Utc>>>,
}

impl FileProcessedLog {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let path = path.into();
        let entries = json_file::load(&path).await?;
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }
}

#[async_trait]
impl ProcessedLog for FileProcessedLog {
    async fn last_processed(&self, payload: &str) -> Result<Option<DateTime<Utc>>, QueueError> {
        Ok(self.entries.lock().await.get(payload).copied())
    }

    async fn record(&self, payload: &str, at: DateTime<Utc>) -> Result<(), QueueError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(payload.to_string(), at);
        json_file::store(&self.path, &next).await?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn file_log_persists_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.json");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        {
            let log = FileProcessedLog::open(&path).await.unwrap();
            assert_eq!(log.last_processed("alice").await.unwrap(), None);
            log.record("alice", at).await.unwrap();
        }

        let log = FileProcessedLog::open(&path).await.unwrap();
        assert_eq!(log.last_processed("alice").await.unwrap(), Some(at));
        assert_eq!(log.last_processed("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn in_memory_log_overwrites() {
        let log = InMemoryProcessedLog::new();
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();

        log.record("alice", first).await.unwrap();
        log.record("alice", second).await.unwrap();
        assert_eq!(log.last_processed("alice").await.unwrap(), Some(second));
    }
}
