//! RecencyGate - "processed too recently" を Skipped にする
//!
//! 直近 `min_wait` 以内に成功した payload は inner を呼ばずに Skipped を返す。
//! Skipped はキューから外れるだけなので、次の投入は producer 側に任せる。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::{ProcessError, ProcessOutcome};
use crate::ports::{Clock, ProcessedLog, Processor};

pub struct RecencyGate {
    inner: Arc<dyn Processor>,
    log: Arc<dyn ProcessedLog>,
    clock: Arc<dyn Clock>,
    min_wait: Duration,
}

impl RecencyGate {
    pub fn new(
        inner: Arc<dyn Processor>,
        log: Arc<dyn ProcessedLog>,
        clock: Arc<dyn Clock>,
        min_wait: Duration,
    ) -> Self {
        Self {
            inner,
            log,
            clock,
            min_wait,
        }
    }

    async fn too_soon(&self, payload: &str) -> Result<bool, ProcessError> {
        if self.min_wait <= Duration::zero() {
            return Ok(false);
        }
        let last = self.log.last_processed(payload).await.map_err(|e| {
            ProcessError::unexpected("failed to read processed log").with_source(e)
        })?;
        let Some(last) = last else {
            return Ok(false);
        };
        // a window reaching past the start of time covers every record
        Ok(match self.clock.now().checked_sub_signed(self.min_wait) {
            Some(cutoff) => last >= cutoff,
            None => true,
        })
    }
}

#[async_trait]
impl Processor for RecencyGate {
    async fn process(&self, payload: &str) -> Result<ProcessOutcome, ProcessError> {
        if self.too_soon(payload).await? {
            return Ok(ProcessOutcome::Skipped);
        }

        let outcome = self.inner.process(payload).await?;
        if outcome == ProcessOutcome::Succeeded {
            self.log
                .record(payload, self.clock.now())
                .await
                .map_err(|e| {
                    ProcessError::unexpected("failed to record processed time").with_source(e)
                })?;
        }
        Ok(outcome)
    }
}
