//! Package manifest generation for cache entries

use crate::error::{MarathonError, MarathonResult};
use crate::package::PackageManager;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Manifest written into every cache entry
pub const PACKAGE_FILE: &str = "Package.swift";

/// Render and write `Package.swift` into `folder`, replacing any previous one.
pub async fn write_package_file(
    packages: &dyn PackageManager,
    folder: &Path,
    name: &str,
    package_urls: &[String],
) -> MarathonResult<PathBuf> {
    let description = packages.make_package_description(name, package_urls).await?;
    let path = folder.join(PACKAGE_FILE);

    fs::write(&path, description)
        .await
        .map_err(|e| MarathonError::FailedToCreatePackageFile {
            path: path.clone(),
            source: e,
        })?;

    debug!("Wrote {} for {}", path.display(), name);
    Ok(path)
}
