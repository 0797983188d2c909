//! Scoped staging folders for remote scripts
//!
//! Downloads and clones land in `<root>/Scripts/Temp/<identifier>/`. The
//! folder belongs to a [`StagingDir`] guard and is deleted when the guard is
//! dropped, whichever way the owning resolution call exits.

use crate::error::{MarathonError, MarathonResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// A temporary folder deleted on drop
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    /// Create an empty staging folder at `path`, clearing leftovers from a
    /// previous run that did not exit cleanly.
    pub async fn create(path: PathBuf) -> MarathonResult<Self> {
        if fs::symlink_metadata(&path).await.is_ok() {
            debug!("Clearing stale staging folder {}", path.display());
            fs::remove_dir_all(&path).await.map_err(|e| {
                MarathonError::io(format!("clearing staging folder {}", path.display()), e)
            })?;
        }

        fs::create_dir_all(&path).await.map_err(|e| {
            MarathonError::io(format!("creating staging folder {}", path.display()), e)
        })?;

        debug!("Created staging folder {}", path.display());
        Ok(Self { path })
    }

    /// Path of the staging folder
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed staging folder {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove staging folder {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
