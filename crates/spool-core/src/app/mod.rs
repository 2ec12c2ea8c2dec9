//! App - アプリケーション層
//!
//! ports を組み合わせて drain を実行する。
//!
//! # 主要コンポーネント
//! - **QueueDrainer**: 1 キューの bounded batch drain
//! - **RecencyGate**: "processed too recently" なら Skipped を返す Processor
//! - **Runner**: 設定された複数キューを順番に drain
//! - **SpoolConfig**: TOML 設定

pub mod config;
pub mod drainer;
pub mod gate;
pub mod runner;

pub use self::config::{QueueConfig, SpoolConfig};
pub use self::drainer::{DrainSettings, QueueDrainer};
pub use self::gate::RecencyGate;
pub use self::runner::Runner;
