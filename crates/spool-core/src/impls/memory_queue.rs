//! In-memory work queue.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::QueueItem;
use crate::ports::{QueueError, WorkQueue};

/// `VecDeque` behind a mutex. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryWorkQueue {
    items: Mutex<VecDeque<QueueItem>>,
}

impl InMemoryWorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = QueueItem>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().collect()),
        }
    }

    pub fn from_payloads<S: Into<String>>(payloads: impl IntoIterator<Item = S>) -> Self {
        Self::with_items(payloads.into_iter().map(QueueItem::new))
    }
}

#[async_trait]
impl WorkQueue for InMemoryWorkQueue {
    async fn peek(&self) -> Result<Option<QueueItem>, QueueError> {
        Ok(self.items.lock().await.front().cloned())
    }

    async fn dequeue(&self) -> Result<(), QueueError> {
        self.items.lock().await.pop_front();
        Ok(())
    }

    async fn enqueue(&self, item: QueueItem, at_front: bool) -> Result<(), QueueError> {
        let mut items = self.items.lock().await;
        if at_front {
            items.push_front(item);
        } else {
            items.push_back(item);
        }
        Ok(())
    }

    async fn requeue(&self, item: QueueItem, at_front: bool) -> Result<(), QueueError> {
        let mut items = self.items.lock().await;
        items.pop_front();
        if at_front {
            items.push_front(item);
        } else {
            items.push_back(item);
        }
        Ok(())
    }

    async fn enqueue_multiple(&self, payloads: Vec<String>) -> Result<(), QueueError> {
        self.items
            .lock()
            .await
            .extend(payloads.into_iter().map(QueueItem::new));
        Ok(())
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
    async fn peek_matches_next_dequeue() {
        let queue = InMemoryWorkQueue::from_payloads(["a", "b"]);

        assert_eq!(queue.peek().await.unwrap(), Some(QueueItem::new("a")));
        queue.dequeue().await.unwrap();
        assert_eq!(queue.peek().await.unwrap(), Some(QueueItem::new("b")));
        queue.dequeue().await.unwrap();
        assert_eq!(queue.peek().await.unwrap(), None);
    }

    #[tokio::test]
    async fn dequeue_on_empty_is_noop() {
        let queue = InMemoryWorkQueue::new();
        queue.dequeue().await.unwrap();
        assert!(queue.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn enqueue_respects_front_flag() {
        let queue = InMemoryWorkQueue::from_payloads(["b"]);
        queue
            .enqueue(QueueItem::with_attempts("a", 2), true)
            .await
            .unwrap();
        queue.enqueue(QueueItem::new("c"), false).await.unwrap();
        queue
            .enqueue_multiple(vec!["d".to_string(), "e".to_string()])
            .await
            .unwrap();

        let payloads: Vec<String> = queue
            .items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.payload)
            .collect();
        assert_eq!(payloads, ["a", "b", "c", "d", "e"]);
        assert_eq!(queue.peek().await.unwrap().unwrap().attempts, 2);
    }
}
