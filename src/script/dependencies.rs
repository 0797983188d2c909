//! Dependency discovery
//!
//! A script declares dependencies in two ways:
//! - a [`Marathonfile`] next to it (packages and extra scripts)
//! - inline markers on its import lines, before any other code:
//!
//! ```swift
//! import Files // marathon:https://github.com/JohnSundell/Files.git
//! ```

use crate::error::{MarathonError, MarathonResult};
use crate::remote::Fetcher;
use crate::script::marathonfile::{Marathonfile, ScriptDependency};
use crate::script::reference::{is_valid_url, raw_download_url};
use crate::script::store::ENTRY_POINT;
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Marker introducing an inline package URL
pub const INLINE_MARKER: &str = "marathon:";

const IMPORT_KEYWORD: &str = "import";

/// Dependencies of one script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    package_urls: BTreeSet<String>,
    scripts: Vec<ScriptDependency>,
}

impl DependencySet {
    /// Discover the dependencies of the script at `path` with content `source`
    pub async fn discover(path: &Path, source: &str) -> MarathonResult<Self> {
        let mut set = Self::default();

        if let Some(folder) = path.parent() {
            if let Some(marathonfile) = Marathonfile::find(folder).await? {
                set.merge_marathonfile(marathonfile);
            }
        }

        set.package_urls.extend(scan_inline_dependencies(source)?);
        debug!(
            "Discovered {} package(s) and {} script(s) for {}",
            set.package_urls.len(),
            set.scripts.len(),
            path.display()
        );
        Ok(set)
    }

    /// Add everything a Marathonfile declares
    pub fn merge_marathonfile(&mut self, marathonfile: Marathonfile) {
        self.package_urls.extend(marathonfile.package_urls);
        self.scripts.extend(marathonfile.scripts);
    }

    /// Package URLs, deduplicated
    pub fn package_urls(&self) -> Vec<String> {
        self.package_urls.iter().cloned().collect()
    }

    /// Scripts to copy, in declaration order
    pub fn scripts(&self) -> &[ScriptDependency] {
        &self.scripts
    }
}

/// Collect package URLs from inline markers.
///
/// Only the leading block of the file is scanned: the first line starting
/// with an alphanumeric character that is not an import ends the scan.
pub fn scan_inline_dependencies(source: &str) -> MarathonResult<Vec<String>> {
    let mut urls = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim_start();

        if is_import_line(trimmed) {
            if let Some(index) = trimmed.find(INLINE_MARKER) {
                let url = trimmed[index + INLINE_MARKER.len()..].trim();
                if !is_valid_url(url) {
                    return Err(MarathonError::InvalidInlineDependencyUrl(url.to_string()));
                }
                urls.push(url.to_string());
            }
            continue;
        }

        if trimmed.chars().next().is_some_and(char::is_alphanumeric) {
            break;
        }
    }

    Ok(urls)
}

/// `import` as a whole keyword, not `importer.run()`
fn is_import_line(trimmed: &str) -> bool {
    match trimmed.strip_prefix(IMPORT_KEYWORD) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

/// Copy dependency scripts into a module's source folder
pub async fn copy_dependency_scripts(
    scripts: &[ScriptDependency],
    destination: &Path,
    fetcher: &dyn Fetcher,
) -> MarathonResult<()> {
    for script in scripts {
        let location = script.location();
        let failure = |reason: String| MarathonError::FailedToAddDependencyScript {
            location: location.clone(),
            reason,
        };

        let file_name = match script {
            ScriptDependency::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            ScriptDependency::Remote(url) => url
                .rsplit('/')
                .next()
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
        .ok_or_else(|| failure("location has no file name".to_string()))?;

        if file_name == ENTRY_POINT {
            return Err(failure(format!("a dependency cannot be named {}", ENTRY_POINT)));
        }

        let content = match script {
            ScriptDependency::Local(path) => fs::read(path)
                .await
                .map_err(|e| failure(e.to_string()))?,
            ScriptDependency::Remote(url) => fetcher
                .download(&raw_download_url(url))
                .await
                .map_err(|e| failure(e.to_string()))?,
        };

        fs::write(destination.join(&file_name), content)
            .await
            .map_err(|e| failure(e.to_string()))?;
        debug!("Copied dependency script {}", location);
    }

    Ok(())
}
