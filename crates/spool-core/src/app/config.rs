//! TOML configuration.
//!
//! ```toml
//! [[queues]]
//! name = "users"
//! path = "queue/users.json"
//! batch_size = 10
//! max_attempts = 3
//! min_wait_minutes = 60
//! processed_log = "state/users.json"
//! feed = "media"
//! command = ["./process-user"]
//!
//! [[queues]]
//! name = "media"
//! path = "queue/media.json"
//!
//! [queues.commands]
//! anime = ["./process-media", "anime"]
//! manga = ["./process-media", "manga"]
//! ```
//!
//! Queues are drained in the order they are declared.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::drainer::DrainSettings;
use crate::error::SpoolError;
use crate::impls::dispatch::CATEGORY_SEPARATOR;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpoolConfig {
    #[serde(default)]
    pub queues: Vec<QueueConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    pub name: String,

    /// JSON file backing the queue.
    pub path: PathBuf,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Skip payloads that succeeded less than this many minutes ago. 0 = off.
    #[serde(default)]
    pub min_wait_minutes: u64,

    /// Where success timestamps are kept. Required when `min_wait_minutes > 0`.
    #[serde(default)]
    pub processed_log: Option<PathBuf>,

    /// Queue that receives the stdout lines of successful commands.
    #[serde(default)]
    pub feed: Option<String>,

    /// One command for every payload...
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// ...or one command per `<category>:` payload prefix.
    #[serde(default)]
    pub commands: BTreeMap<String, Vec<String>>,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl QueueConfig {
    pub fn settings(&self) -> DrainSettings {
        DrainSettings {
            batch_size: self.batch_size,
            max_attempts: self.max_attempts,
        }
    }

    pub fn min_wait(&self) -> chrono::Duration {
        let minutes = i64::try_from(self.min_wait_minutes).unwrap_or(i64::MAX);
        chrono::Duration::try_minutes(minutes).unwrap_or(chrono::Duration::MAX)
    }

    fn validate(&self) -> Result<(), SpoolError> {
        let invalid = |msg: String| Err(SpoolError::InvalidConfig(msg));
        let name = &self.name;

        if name.trim().is_empty() {
            return invalid("queue name must not be empty".to_string());
        }

        match (&self.command, self.commands.is_empty()) {
            (Some(_), false) => {
                return invalid(format!(
                    "queue {name}: set either `command` or `commands`, not both"
                ));
            }
            (None, true) => {
                return invalid(format!("queue {name}: `command` or `commands` is required"));
            }
            (Some(command), true) if command.is_empty() => {
                return invalid(format!("queue {name}: `command` must not be empty"));
            }
            _ => {}
        }

        for (category, command) in &self.commands {
            if category.is_empty() || category.contains(CATEGORY_SEPARATOR) {
                return invalid(format!("queue {name}: invalid category {category:?}"));
            }
            if command.is_empty() {
                return invalid(format!(
                    "queue {name}: command for category {category} must not be empty"
                ));
            }
        }

        if self.min_wait_minutes > 0 && self.processed_log.is_none() {
            return invalid(format!(
                "queue {name}: `processed_log` is required when `min_wait_minutes` is set"
            ));
        }

        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.path = base.join(&self.path);
        if let Some(log) = &self.processed_log {
            self.processed_log = Some(base.join(log));
        }
    }
}

impl SpoolConfig {
    /// Read, parse and validate `path`. Relative queue/log paths are taken
    /// relative to the directory of the config file.
    pub fn load(path: &Path) -> Result<Self, SpoolError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SpoolError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&raw)?;

        if let Some(base) = path.parent() {
            for queue in &mut config.queues {
                queue.resolve_paths(base);
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, SpoolError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SpoolError> {
        if self.queues.is_empty() {
            return Err(SpoolError::InvalidConfig("no queues configured".to_string()));
        }

        let mut names = HashSet::new();
        let mut paths = HashSet::new();
        for queue in &self.queues {
            queue.validate()?;
            if !names.insert(queue.name.as_str()) {
                return Err(SpoolError::InvalidConfig(format!(
                    "duplicate queue name {}",
                    queue.name
                )));
            }
            // two queues on one file would overwrite each other
            if !paths.insert(queue.path.as_path()) {
                return Err(SpoolError::InvalidConfig(format!(
                    "queue {}: path {} is already used by another queue",
                    queue.name,
                    queue.path.display()
                )));
            }
        }

        // A feed target must be drained after its producer in the same run.
        for (index, queue) in self.queues.iter().enumerate() {
            let Some(feed) = &queue.feed else {
                continue;
            };
            let target = self.queues.iter().position(|q| &q.name == feed);
            match target {
                Some(target) if target > index => {}
                Some(_) => {
                    return Err(SpoolError::InvalidConfig(format!(
                        "queue {}: feed {feed} must be declared after it",
                        queue.name
                    )));
                }
                None => {
                    return Err(SpoolError::InvalidConfig(format!(
                        "queue {}: feed {feed} is not a configured queue",
                        queue.name
                    )));
                }
            }
        }

        Ok(())
    }
}
