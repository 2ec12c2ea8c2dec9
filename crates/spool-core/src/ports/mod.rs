//! Ports - 抽象化レイヤー
//!
//! drain loop が外部に求めるものを trait として定義する。
//! 実装は `impls` に置く。
//!
//! - `WorkQueue`: 永続 FIFO（peek / dequeue / enqueue）
//! - `Processor`: payload ごとの処理
//! - `Logger`: ログの出力先
//! - `Clock`, `ProcessedLog`: "too soon" 判定用

pub mod clock;
pub mod logger;
pub mod processed_log;
pub mod processor;
pub mod work_queue;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::logger::Logger;
pub use self::processed_log::ProcessedLog;
pub use self::processor::{FnProcessor, Processor};
pub use self::work_queue::{QueueError, WorkQueue};
