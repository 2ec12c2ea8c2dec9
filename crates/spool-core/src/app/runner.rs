//! Runner - drain several queues one after another.
//!
//! A producer queue (e.g. users) can feed a derived queue (e.g. media); the
//! derived queue is drained later in the same run, never concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use super::config::{QueueConfig, SpoolConfig};
use super::drainer::{DrainSettings, QueueDrainer};
use super::gate::RecencyGate;
use crate::error::SpoolError;
use crate::impls::{CategoryDispatch, CommandProcessor, FileProcessedLog, FileWorkQueue};
use crate::observability::QueueReport;
use crate::ports::{Logger, Processor, SystemClock, WorkQueue};

struct DrainJob {
    name: String,
    queue: Arc<dyn WorkQueue>,
    processor: Arc<dyn Processor>,
    drainer: QueueDrainer,
}

pub struct Runner {
    jobs: Vec<DrainJob>,
    logger: Arc<dyn Logger>,
}

impl Runner {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            jobs: Vec::new(),
            logger,
        }
    }

    /// Append a queue to the run. Queues drain in the order they are added.
    pub fn with_queue(
        mut self,
        name: impl Into<String>,
        queue: Arc<dyn WorkQueue>,
        processor: Arc<dyn Processor>,
        settings: DrainSettings,
    ) -> Self {
        self.jobs.push(DrainJob {
            name: name.into(),
            queue,
            processor,
            drainer: QueueDrainer::new(settings, Arc::clone(&self.logger)),
        });
        self
    }

    /// Open every configured queue and wire up its processor.
    pub async fn from_config(
        config: &SpoolConfig,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, SpoolError> {
        config.validate()?;

        let mut queues: HashMap<&str, Arc<dyn WorkQueue>> = HashMap::new();
        for qc in &config.queues {
            let queue = FileWorkQueue::open(&qc.path).await?;
            queues.insert(qc.name.as_str(), Arc::new(queue));
        }

        let mut runner = Self::new(logger);
        for qc in &config.queues {
            let feed = match &qc.feed {
                Some(feed) => Some(
                    queues
                        .get(feed.as_str())
                        .cloned()
                        .ok_or_else(|| SpoolError::UnknownQueue(feed.clone()))?,
                ),
                None => None,
            };
            let processor = build_processor(qc, feed).await?;
            let queue = queues
                .get(qc.name.as_str())
                .cloned()
                .ok_or_else(|| SpoolError::UnknownQueue(qc.name.clone()))?;
            runner = runner.with_queue(qc.name.clone(), queue, processor, qc.settings());
        }

        Ok(runner)
    }

    pub fn queue_names(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.name.as_str()).collect()
    }

    pub fn queue(&self, name: &str) -> Option<Arc<dyn WorkQueue>> {
        self.jobs
            .iter()
            .find(|j| j.name == name)
            .map(|j| Arc::clone(&j.queue))
    }

    /// Drain every queue once, in order.
    pub async fn run(&self) -> Result<Vec<QueueReport>, SpoolError> {
        let mut reports = Vec::with_capacity(self.jobs.len());

        for job in &self.jobs {
            let settings = job.drainer.settings();
            self.logger.log(&format!(
                "draining {} (batch {}, max attempts {})",
                job.name, settings.batch_size, settings.max_attempts
            ));

            let report = job
                .drainer
                .drain(job.queue.as_ref(), job.processor.as_ref())
                .await?;
            let remaining = job.queue.len().await?;

            tracing::info!(
                queue = %job.name,
                processed = report.processed,
                skipped = report.skipped,
                failures = report.failures(),
                rejected = report.rejected,
                remaining,
                "queue drained"
            );
            reports.push(QueueReport {
                queue: job.name.clone(),
                report,
                remaining,
            });
        }

        Ok(reports)
    }
}

async fn build_processor(
    qc: &QueueConfig,
    feed: Option<Arc<dyn WorkQueue>>,
) -> Result<Arc<dyn Processor>, SpoolError> {
    let command_processor = |command: &[String]| -> Result<CommandProcessor, SpoolError> {
        let processor = CommandProcessor::new(command)?;
        Ok(match &feed {
            Some(feed) => processor.with_feed(Arc::clone(feed)),
            None => processor,
        })
    };

    let processor: Arc<dyn Processor> = match &qc.command {
        Some(command) => Arc::new(command_processor(command.as_slice())?),
        None => {
            let mut dispatch = CategoryDispatch::new();
            for (category, command) in &qc.commands {
                let processor = command_processor(command.as_slice())?;
                dispatch.register(category.clone(), Arc::new(processor))?;
            }
            Arc::new(dispatch)
        }
    };

    if qc.min_wait_minutes == 0 {
        return Ok(processor);
    }

    let log_path = qc.processed_log.as_ref().ok_or_else(|| {
        SpoolError::InvalidConfig(format!("queue {}: `processed_log` is required", qc.name))
    })?;
    let log = FileProcessedLog::open(log_path).await?;
    Ok(Arc::new(RecencyGate::new(
        processor,
        Arc::new(log),
        Arc::new(SystemClock),
        qc.min_wait(),
    )))
}
