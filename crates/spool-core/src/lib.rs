//! spool-core
//!
//! Bounded-batch, at-least-once drain loop over a persistent FIFO queue.
//!
//! # モジュール構成
//! - **domain**: QueueItem, ProcessOutcome, ProcessError / ErrorKind
//! - **ports**: WorkQueue, Processor, Logger, Clock, ProcessedLog
//! - **impls**: InMemoryWorkQueue, FileWorkQueue, CommandProcessor, CategoryDispatch など
//! - **app**: QueueDrainer, RecencyGate, Runner, SpoolConfig
//! - **observability**: DrainReport / QueueReport
//! - **error**: SpoolError

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{DrainSettings, QueueDrainer, Runner, SpoolConfig};
pub use domain::{ErrorKind, ProcessError, ProcessOutcome, QueueItem};
pub use error::SpoolError;
pub use observability::{DrainReport, QueueReport};
pub use ports::{Logger, Processor, WorkQueue};
