//! Marathonfile parsing
//!
//! A `Marathonfile` next to a script lists extra dependencies, one per line:
//!
//! ```text
//! https://github.com/JohnSundell/Files.git
//! ../Shared/Helpers.swift
//! https://example.com/scripts/Colors.swift
//! ```
//!
//! Entries ending in `.swift` are scripts copied into the project; everything
//! else is a package URL. Relative paths are resolved against the folder the
//! Marathonfile lives in.

use crate::error::{MarathonError, MarathonResult};
use crate::script::identifier::SCRIPT_EXTENSION;
use crate::script::reference::{expand_path, is_valid_url};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File name of the dependency manifest
pub const MARATHONFILE: &str = "Marathonfile";

/// A script file to copy into a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptDependency {
    /// A file on disk
    Local(PathBuf),
    /// A file to download
    Remote(String),
}

impl ScriptDependency {
    /// Human-readable location
    pub fn location(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::Remote(url) => url.clone(),
        }
    }
}

/// Parsed Marathonfile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marathonfile {
    /// Package URLs, in file order
    pub package_urls: Vec<String>,
    /// Scripts to copy, in file order
    pub scripts: Vec<ScriptDependency>,
}

impl Marathonfile {
    /// Parse Marathonfile content; `base` resolves relative paths
    pub fn parse(content: &str, base: &Path) -> Self {
        let mut file = Self::default();

        for entry in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if entry.ends_with(SCRIPT_EXTENSION) {
                file.scripts.push(script_dependency(entry, base));
            } else if is_valid_url(entry) {
                file.package_urls.push(entry.to_string());
            } else {
                let path = expand_path(entry, base);
                file.package_urls.push(path.display().to_string());
            }
        }

        file
    }

    /// Load the Marathonfile in `folder`, if there is one
    pub async fn find(folder: &Path) -> MarathonResult<Option<Self>> {
        let path = folder.join(MARATHONFILE);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(MarathonError::io(format!("reading {}", path.display()), e))
            }
        };

        let file = Self::parse(&content, folder);
        debug!(
            "Loaded {}: {} package(s), {} script(s)",
            path.display(),
            file.package_urls.len(),
            file.scripts.len()
        );
        Ok(Some(file))
    }
}

fn script_dependency(entry: &str, base: &Path) -> ScriptDependency {
    if let Some(path) = entry.strip_prefix("file://") {
        return ScriptDependency::Local(PathBuf::from(path));
    }
    if entry.starts_with("http://") || entry.starts_with("https://") {
        return ScriptDependency::Remote(entry.to_string());
    }
    ScriptDependency::Local(expand_path(entry, base))
}
