//! File-backed work queue.
//!
//! The whole queue lives in one JSON array, front first:
//! `[{"payload": "alice", "attempts": 0}, ...]`.
//! Every mutation rewrites the file before the in-memory copy is updated, so
//! a failed write leaves both sides at the previous state.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::json_file;
use crate::domain::QueueItem;
use crate::ports::{QueueError, WorkQueue};

pub struct FileWorkQueue {
    path: PathBuf,
    items: Mutex<VecDeque<QueueItem>>,
}

impl FileWorkQueue {
    /// Open (or lazily create) the queue stored at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let path = path.into();
        let items: VecDeque<QueueItem> = json_file::load(&path).await?;
        tracing::debug!(path = %path.display(), len = items.len(), "opened queue file");
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn update<F>(&self, mutate: F) -> Result<(), QueueError>
    where
        F: FnOnce(&mut VecDeque<QueueItem>) -> bool,
    {
        let mut items = self.items.lock().await;
        let mut next = items.clone();
        if !mutate(&mut next) {
            return Ok(());
        }
        json_file::store(&self.path, &next).await?;
        *items = next;
        Ok(())
    }
}

#[async_trait]
impl WorkQueue for FileWorkQueue {
    async fn peek(&self) -> Result<Option<QueueItem>, QueueError> {
        Ok(self.items.lock().await.front().cloned())
    }

    async fn dequeue(&self) -> Result<(), QueueError> {
        self.update(|items| items.pop_front().is_some()).await
    }

    async fn enqueue(&self, item: QueueItem, at_front: bool) -> Result<(), QueueError> {
        self.update(|items| {
            if at_front {
                items.push_front(item);
            } else {
                items.push_back(item);
            }
            true
        })
        .await
    }

    async fn requeue(&self, item: QueueItem, at_front: bool) -> Result<(), QueueError> {
        self.update(|items| {
            items.pop_front();
            if at_front {
                items.push_front(item);
            } else {
                items.push_back(item);
            }
            true
        })
        .await
    }

    async fn enqueue_multiple(&self, payloads: Vec<String>) -> Result<(), QueueError> {
        if payloads.is_empty() {
            return Ok(());
        }
        self.update(|items| {
            items.extend(payloads.into_iter().map(QueueItem::new));
            true
        })
        .await
    }

    async fn len(&self) -> Result<usize, QueueError> {
        Ok(self.items.lock().await.len())
    }

    async fn items(&self) -> Result<Vec<QueueItem>, QueueError> {
        Ok(self.items.lock().await.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        {
            let queue = FileWorkQueue::open(&path).await.unwrap();
            queue
                .enqueue_multiple(vec!["alice".into(), "bob".into()])
                .await
                .unwrap();
            queue
                .enqueue(QueueItem::with_attempts("carol", 2), true)
                .await
                .unwrap();
            queue.dequeue().await.unwrap();
        }

        let queue = FileWorkQueue::open(&path).await.unwrap();
        assert_eq!(
            queue.items().await.unwrap(),
            vec![QueueItem::new("alice"), QueueItem::new("bob")]
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_queue() {
        let dir = tempfile::tempdir().unwrap();
        let queue = FileWorkQueue::open(dir.path().join("none.json"))
            .await
            .unwrap();
        assert_eq!(queue.peek().await.unwrap(), None);

        // no write happens for a no-op dequeue
        queue.dequeue().await.unwrap();
        assert!(!queue.path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "[{\"payload\":").await.unwrap();

        let err = FileWorkQueue::open(&path).await.err().unwrap();
        assert!(matches!(err, QueueError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn requeue_replaces_front_in_one_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        {
            let queue = FileWorkQueue::open(&path).await.unwrap();
            queue
                .enqueue_multiple(vec!["alice".into(), "bob".into()])
                .await
                .unwrap();
            queue
                .requeue(QueueItem::with_attempts("alice", 1), true)
                .await
                .unwrap();
            assert_eq!(
                queue.items().await.unwrap(),
                vec![QueueItem::with_attempts("alice", 1), QueueItem::new("bob")]
            );
            queue.requeue(QueueItem::new("alice"), false).await.unwrap();
        }

        let queue = FileWorkQueue::open(&path).await.unwrap();
        assert_eq!(
            queue.items().await.unwrap(),
            vec![QueueItem::new("bob"), QueueItem::new("alice")]
        );
    }

    #[tokio::test]
    async fn file_is_written_front_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.json");
        let queue = FileWorkQueue::open(&path).await.unwrap();
        queue.enqueue(QueueItem::new("anime:1"), false).await.unwrap();
        queue
            .enqueue(QueueItem::with_attempts("manga:2", 1), true)
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([
                {"payload": "manga:2", "attempts": 1},
                {"payload": "anime:1", "attempts": 0},
            ])
        );
    }
}
