//! Scratch-workspace lifecycle: a transient directory that holds freshly
//! fetched repositories and must never survive the run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::FilesystemError;

/// Exclusive handle on the scratch directory. Dropping the handle removes
/// the directory if [`ScratchWorkspace::release`] was not called, so the
/// workspace is torn down on every exit path, including early returns and
/// panics.
pub struct ScratchWorkspace {
    path: PathBuf,
    released: bool,
}

impl ScratchWorkspace {
    /// Force-remove any stale scratch directory at `path` and create a
    /// fresh, empty one.
    pub fn acquire(path: &Path) -> Result<Self, FilesystemError> {
        force_remove(path)?;
        fs::create_dir_all(path)
            .map_err(|e| FilesystemError::new("create scratch directory", path, e))?;
        debug!(path = %path.display(), "Acquired scratch workspace");
        Ok(Self {
            path: path.to_path_buf(),
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the scratch directory, reporting failure to the caller.
    /// Callers treat the error as a best-effort teardown failure: it is
    /// logged, never escalated.
    pub fn release(mut self) -> Result<(), FilesystemError> {
        self.released = true;
        debug!(path = %self.path.display(), "Releasing scratch workspace");
        force_remove(&self.path)
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = force_remove(&self.path) {
            warn!(error = %e, path = %self.path.display(), "Scratch workspace teardown failed");
        }
    }
}

/// Recursively delete `path`, tolerating read-only entries: checkout tools
/// may mark retrieved objects read-only, so on the first failure every
/// reachable entry's read-only bit is cleared and the deletion is retried
/// exactly once. Any remaining error is propagated.
pub fn force_remove(path: &Path) -> Result<(), FilesystemError> {
    if !path.exists() {
        return Ok(());
    }
    if fs::remove_dir_all(path).is_ok() {
        return Ok(());
    }
    clear_readonly(path);
    fs::remove_dir_all(path).map_err(|e| FilesystemError::new("remove directory tree", path, e))
}

fn clear_readonly(path: &Path) {
    for entry in WalkDir::new(path).into_iter().filter_map(Result::ok) {
        if let Ok(metadata) = entry.metadata() {
            let mut permissions = metadata.permissions();
            if permissions.readonly() {
                permissions.set_readonly(false);
                let _ = fs::set_permissions(entry.path(), permissions);
            }
        }
    }
}
