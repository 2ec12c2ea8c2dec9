//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryWorkQueue**: テスト・組み込み用のキュー
//! - **FileWorkQueue**: JSON ファイルに永続化するキュー
//! - **InMemoryProcessedLog / FileProcessedLog**: "too soon" 判定の記録
//! - **TracingLogger / RecordingLogger**: Logger 実装
//! - **CategoryDispatch**: category -> Processor の明示的なマップ
//! - **CommandProcessor**: 外部コマンドで payload を処理する

pub mod command;
pub mod dispatch;
pub mod file_queue;
pub mod logger;
pub mod memory_queue;
pub mod processed_log;

mod json_file;

pub use self::command::CommandProcessor;
pub use self::dispatch::CategoryDispatch;
pub use self::file_queue::FileWorkQueue;
pub use self::logger::{RecordingLogger, TracingLogger};
pub use self::memory_queue::InMemoryWorkQueue;
pub use self::processed_log::{FileProcessedLog, InMemoryProcessedLog};
