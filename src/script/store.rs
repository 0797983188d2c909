//! Script cache store
//!
//! Every resolved script gets a folder under `<root>/Scripts/Cache`, named by
//! its identifier:
//!
//! ```text
//! <root>/Scripts/Cache/<identifier>/
//! ├── OriginalFile            # symlink to the script it was resolved from
//! ├── Sources/<Module>/       # main.swift + dependency scripts
//! └── Package.swift
//! <root>/Scripts/Temp/<identifier>/   # staged remote content
//! ```
//!
//! `Sources` is rebuilt on every resolution. `OriginalFile` is written once.
//! Entries whose `OriginalFile` no longer points at anything are deleted the
//! next time the cache is listed.

use crate::error::{MarathonError, MarathonResult};
use crate::script::staging::StagingDir;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Name of the link recording where a cached script came from
pub const ORIGINAL_FILE: &str = "OriginalFile";

/// Folder holding the script's package sources
pub const SOURCES_DIR: &str = "Sources";

/// File name the build tool treats as the program entry point
pub const ENTRY_POINT: &str = "main.swift";

/// A script currently held in the cache
#[derive(Debug, Clone, Serialize)]
pub struct ManagedScript {
    /// Cache identifier (folder name)
    pub identifier: String,
    /// Path the script was originally resolved from
    pub original: PathBuf,
    /// Cache folder
    pub folder: PathBuf,
    /// Last time the entry was regenerated
    pub modified_at: Option<DateTime<Utc>>,
}

/// Owner of the script cache folders
#[derive(Debug, Clone)]
pub struct CacheStore {
    scripts_dir: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `root` (e.g. `~/.marathon`)
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            scripts_dir: root.as_ref().join("Scripts"),
        }
    }

    /// Folder holding all cache entries
    pub fn cache_dir(&self) -> PathBuf {
        self.scripts_dir.join("Cache")
    }

    /// Folder holding staged remote content
    pub fn temp_dir(&self) -> PathBuf {
        self.scripts_dir.join("Temp")
    }

    /// Cache folder for an identifier (may not exist yet)
    pub fn folder(&self, identifier: &str) -> PathBuf {
        self.cache_dir().join(identifier)
    }

    /// Get or create the cache folder for an identifier
    pub async fn entry(&self, identifier: &str) -> MarathonResult<PathBuf> {
        let folder = self.folder(identifier);
        fs::create_dir_all(&folder).await.map_err(|e| {
            MarathonError::io(format!("creating cache folder {}", folder.display()), e)
        })?;
        Ok(folder)
    }

    /// Create a staging folder for remote content with this identifier
    pub async fn staging(&self, identifier: &str) -> MarathonResult<StagingDir> {
        StagingDir::create(self.temp_dir().join(identifier)).await
    }

    /// Write `file` into the entry as the module's entry point.
    ///
    /// Links `OriginalFile` to `file` unless the link already exists, then
    /// replaces `Sources/` with a fresh `Sources/<module>/main.swift`.
    /// Returns the module's source folder.
    pub async fn materialize_source(
        &self,
        folder: &Path,
        file: &Path,
        module: &str,
    ) -> MarathonResult<PathBuf> {
        let link = folder.join(ORIGINAL_FILE);
        if fs::symlink_metadata(&link).await.is_err() {
            create_symlink(file, &link).await.map_err(|e| {
                MarathonError::io(
                    format!("linking {} to {}", link.display(), file.display()),
                    e,
                )
            })?;
            debug!("Linked {} -> {}", link.display(), file.display());
        }

        let sources = folder.join(SOURCES_DIR);
        if fs::symlink_metadata(&sources).await.is_ok() {
            fs::remove_dir_all(&sources).await.map_err(|e| {
                MarathonError::io(format!("clearing {}", sources.display()), e)
            })?;
        }

        let module_dir = sources.join(module);
        fs::create_dir_all(&module_dir).await.map_err(|e| {
            MarathonError::io(format!("creating {}", module_dir.display()), e)
        })?;

        fs::copy(file, module_dir.join(ENTRY_POINT))
            .await
            .map_err(|e| MarathonError::io(format!("copying {}", file.display()), e))?;

        Ok(module_dir)
    }

    /// Delete the entry for an identifier. Missing entries are not an error.
    pub async fn remove(&self, identifier: &str) -> MarathonResult<()> {
        let folder = self.folder(identifier);
        if fs::symlink_metadata(&folder).await.is_err() {
            debug!("No cache entry for {}", identifier);
            return Ok(());
        }

        fs::remove_dir_all(&folder)
            .await
            .map_err(|e| MarathonError::FailedToRemoveScriptFolder {
                path: folder.clone(),
                source: e,
            })?;

        info!("Removed cache entry {}", identifier);
        Ok(())
    }

    /// Delete every cache entry
    pub async fn remove_all(&self) -> MarathonResult<()> {
        let cache_dir = self.cache_dir();
        if fs::symlink_metadata(&cache_dir).await.is_err() {
            return Ok(());
        }

        fs::remove_dir_all(&cache_dir)
            .await
            .map_err(|e| MarathonError::FailedToRemoveScriptFolder {
                path: cache_dir.clone(),
                source: e,
            })?;

        info!("Removed all cache entries");
        Ok(())
    }

    /// List cached scripts, deleting entries whose original file is gone.
    pub async fn list_managed(&self) -> MarathonResult<Vec<ManagedScript>> {
        let cache_dir = self.cache_dir();
        let mut entries = match fs::read_dir(&cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(MarathonError::io(
                    format!("reading cache folder {}", cache_dir.display()),
                    e,
                ))
            }
        };

        let mut scripts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MarathonError::io("reading cache entry", e))?
        {
            let folder = entry.path();
            if !folder.is_dir() {
                continue;
            }

            let identifier = entry.file_name().to_string_lossy().to_string();
            match live_original(&folder).await {
                Some(original) => {
                    let modified_at = fs::metadata(&folder)
                        .await
                        .and_then(|m| m.modified())
                        .ok()
                        .map(DateTime::<Utc>::from);

                    scripts.push(ManagedScript {
                        identifier,
                        original,
                        folder,
                        modified_at,
                    });
                }
                None => {
                    debug!("Collecting orphaned cache entry {}", identifier);
                    if let Err(e) = fs::remove_dir_all(&folder).await {
                        warn!("Failed to remove orphaned entry {}: {}", folder.display(), e);
                    }
                }
            }
        }

        scripts.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(scripts)
    }
}

/// Target of an entry's `OriginalFile` link, if it still exists.
async fn live_original(folder: &Path) -> Option<PathBuf> {
    let target = fs::read_link(folder.join(ORIGINAL_FILE)).await.ok()?;
    if target.as_os_str().is_empty() || fs::metadata(&target).await.is_err() {
        return None;
    }
    Some(target)
}

/// Create a symlink at `link` pointing to `target`
pub(crate) async fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        fs::symlink(target, link).await
    }
    #[cfg(windows)]
    {
        if target.is_dir() {
            fs::symlink_dir(target, link).await
        } else {
            fs::symlink_file(target, link).await
        }
    }
}
