//! Shared JSON file persistence for the file-backed ports.
//!
//! Writes go to `<path>.tmp` first and are renamed over the target, so a
//! crash mid-write leaves the previous contents intact.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ports::QueueError;

fn io_error(path: &Path, source: std::io::Error) -> QueueError {
    QueueError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load `path`, treating a missing or blank file as `T::default()`.
pub(crate) async fn load<T>(path: &Path) -> Result<T, QueueError>
where
    T: DeserializeOwned + Default,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(io_error(path, e)),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes).map_err(|source| QueueError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) async fn store<T>(path: &Path, value: &T) -> Result<(), QueueError>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error(parent, e))?;
    }

    let bytes = serde_json::to_vec_pretty(value).map_err(|source| QueueError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| io_error(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error(path, e))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
