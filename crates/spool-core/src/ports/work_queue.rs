//! WorkQueue port - persistent FIFO of [`QueueItem`]s.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::QueueItem;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("queue file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Queue port (interface).
///
/// - `peek` always returns the item that `dequeue` would remove next.
/// - `dequeue` on an empty queue is a no-op.
/// - The drainer assumes it is the only caller while a drain runs;
///   implementations only need to keep their own state consistent.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Look at the front item without removing it.
    async fn peek(&self) -> Result<Option<QueueItem>, QueueError>;

    /// Remove the front item.
    async fn dequeue(&self) -> Result<(), QueueError>;

    /// Insert at the front (`at_front = true`) or the back.
    async fn enqueue(&self, item: QueueItem, at_front: bool) -> Result<(), QueueError>;

    /// Replace the front item with `item`, placed at the front or the back.
    ///
    /// The default is `dequeue` then `enqueue`, which can lose the item if the
    /// second step fails. Persistent queues override it with a single write.
    async fn requeue(&self, item: QueueItem, at_front: bool) -> Result<(), QueueError> {
        self.dequeue().await?;
        self.enqueue(item, at_front).await
    }

    /// Append fresh items (attempts = 0) to the back, in order.
    async fn enqueue_multiple(&self, payloads: Vec<String>) -> Result<(), QueueError>;

    async fn len(&self) -> Result<usize, QueueError>;

    /// Snapshot of the queue, front first.
    async fn items(&self) -> Result<Vec<QueueItem>, QueueError>;

    async fn is_empty(&self) -> Result<bool, QueueError> {
        Ok(self.len().await? == 0)
    }
}
