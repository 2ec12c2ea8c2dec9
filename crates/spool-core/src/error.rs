use std::path::PathBuf;

use thiserror::Error;

use crate::ports::QueueError;

#[derive(Debug, Error)]
pub enum SpoolError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("duplicate processor for category={0}")]
    DuplicateProcessor(String),

    #[error("unknown queue {0}")]
    UnknownQueue(String),
}
