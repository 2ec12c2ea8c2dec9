//! ProcessedLog port - when was a payload last processed successfully.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::QueueError;

#[async_trait]
pub trait ProcessedLog: Send + Sync {
    async fn last_processed(&self, payload: &str) -> Result<Option<DateTime<Utc>>, QueueError>;

    async fn record(&self, payload: &str, at: DateTime<Utc>) -> Result<(), QueueError>;
}
