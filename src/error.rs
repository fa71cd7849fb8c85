use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of the external checkout tool: the tool could not be launched or
/// exited non-zero. Carries the invoked command line (credentials redacted)
/// and whatever diagnostic output the tool produced.
#[derive(Debug, Error)]
#[error("checkout command `{command}` failed: {detail}")]
pub struct FetchError {
    pub command: String,
    pub detail: String,
}

/// A local filesystem operation failed, with the path it failed on.
#[derive(Debug, Error)]
#[error("failed to {action} {}: {source}", .path.display())]
pub struct FilesystemError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FilesystemError {
    pub fn new(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn from_walk(action: &'static str, root: &Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("directory walk aborted"));
        Self::new(action, path, source)
    }
}

/// Configuration problems detected before any source starts processing.
/// These are fatal for the whole run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("environment variable {name} referenced by source url `{url}` is not set")]
    MissingToken { name: String, url: String },
    #[error("source entry {index} is malformed: {reason}")]
    MalformedSource { index: usize, reason: &'static str },
}

/// Per-source pipeline error. Aborts the current source only; the batch
/// continues with the next configured source.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}
