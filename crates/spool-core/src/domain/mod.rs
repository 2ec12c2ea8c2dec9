//! Domain model (queue items, process outcomes, error kinds).
//!
//! このモジュールはキューやプロセスの実装を知らない。
//! drain loop が扱う「形」だけを定義する。

pub mod errors;
pub mod item;
pub mod outcome;

pub use self::errors::{ErrorKind, ProcessError};
pub use self::item::QueueItem;
pub use self::outcome::ProcessOutcome;
