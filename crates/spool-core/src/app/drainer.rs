//! QueueDrainer - bounded-batch drain loop
//!
//! # フロー（1 アイテムごと）
//! 1. `peek` で先頭を取得（なければ終了）
//! 2. Processor 実行（panic も捕捉する）
//! 3. 結果に応じて dequeue / 再投入 / カウント
//!
//! | outcome                    | requeue        | attempts | processed |
//! |----------------------------|----------------|----------|-----------|
//! | Succeeded                  | no             | -        | +1        |
//! | Skipped                    | no             | -        | -         |
//! | failure, attempts < max    | front          | +1       | -         |
//! | failure, attempts >= max   | back           | reset 0  | -         |
//! | rejected                   | no             | -        | -         |
//!
//! Failures never count toward the batch, so an item that keeps failing keeps
//! the loop going until it succeeds. There is deliberately no retry cap here.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::domain::{ErrorKind, ProcessError, ProcessOutcome};
use crate::observability::DrainReport;
use crate::ports::{Logger, Processor, QueueError, WorkQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainSettings {
    /// Successes to reach before stopping. 0 = do nothing.
    pub batch_size: usize,

    /// Failures below this go back to the front, at or above it to the back.
    pub max_attempts: u32,
}

pub struct QueueDrainer {
    settings: DrainSettings,
    logger: Arc<dyn Logger>,
}

impl QueueDrainer {
    pub fn new(settings: DrainSettings, logger: Arc<dyn Logger>) -> Self {
        Self { settings, logger }
    }

    pub fn settings(&self) -> DrainSettings {
        self.settings
    }

    /// Drain up to `batch_size` successes from `queue`.
    ///
    /// Processor failures (including panics) are logged and fed back into the
    /// queue; they never surface here. The only error is the queue itself
    /// failing to read or persist.
    pub async fn drain<Q, P>(&self, queue: &Q, processor: &P) -> Result<DrainReport, QueueError>
    where
        Q: WorkQueue + ?Sized,
        P: Processor + ?Sized,
    {
        let mut report = DrainReport::default();

        while report.processed < self.settings.batch_size {
            let Some(mut item) = queue.peek().await? else {
                break;
            };

            match run_contained(processor, &item.payload).await {
                Ok(outcome) if outcome.counts_toward_quota() => {
                    queue.dequeue().await?;
                    report.processed += 1;
                    tracing::debug!(payload = %item.payload, "succeeded");
                }
                Ok(_) => {
                    self.logger.log(&format!("skip: {}", item.payload));
                    queue.dequeue().await?;
                    report.skipped += 1;
                    tracing::debug!(payload = %item.payload, "skipped");
                }
                Err(err) if !err.is_retryable() => {
                    self.log_failure(&item.payload, &err);
                    queue.dequeue().await?;
                    report.rejected += 1;
                    tracing::debug!(payload = %item.payload, "rejected");
                }
                Err(err) => {
                    self.log_failure(&item.payload, &err);

                    let at_front = item.record_failure(self.settings.max_attempts);
                    if at_front {
                        report.retried += 1;
                    } else {
                        report.recycled += 1;
                    }
                    tracing::debug!(
                        payload = %item.payload,
                        attempts = item.attempts,
                        at_front,
                        "requeued after failure"
                    );
                    queue.requeue(item, at_front).await?;
                }
            }
        }

        Ok(report)
    }

    fn log_failure(&self, payload: &str, err: &ProcessError) {
        match err.kind() {
            ErrorKind::Known | ErrorKind::Rejected => {
                self.logger.log(&format!("error: {payload}: {err}"));
            }
            ErrorKind::Unexpected => {
                self.logger.log(&format!("error: {payload}"));
                self.logger.log(&err.detail());
            }
        }
    }
}

/// Run the processor, turning a panic into an `Unexpected` failure.
async fn run_contained<P>(processor: &P, payload: &str) -> Result<ProcessOutcome, ProcessError>
where
    P: Processor + ?Sized,
{
    match AssertUnwindSafe(processor.process(payload))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => Err(ProcessError::unexpected(format!(
            "processor panicked: {}",
            panic_message(panic.as_ref())
        ))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
