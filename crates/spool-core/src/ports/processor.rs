//! Processor port - handles one payload.

use async_trait::async_trait;

use crate::domain::{ProcessError, ProcessOutcome};

/// A processor for queue payloads.
///
/// The drainer calls this once per attempt. It may block on I/O; nothing
/// else in the drain runs until it returns.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, payload: &str) -> Result<ProcessOutcome, ProcessError>;
}

/// Adapter for a plain synchronous closure.
///
/// ```ignore
/// let p = FnProcessor::new(|payload: &str| {
///     if payload.is_empty() {
///         return Err(ProcessError::known("empty payload"));
///     }
///     Ok(ProcessOutcome::Succeeded)
/// });
/// ```
pub struct FnProcessor<F> {
    f: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(&str) -> Result<ProcessOutcome, ProcessError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Processor for FnProcessor<F>
where
    F: Fn(&str) -> Result<ProcessOutcome, ProcessError> + Send + Sync,
{
    async fn process(&self, payload: &str) -> Result<ProcessOutcome, ProcessError> {
        (self.f)(payload)
    }
}
