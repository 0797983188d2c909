//! Registry of packages added on behalf of scripts
//!
//! Stored as JSON at `<root>/Packages/packages.json`.

use crate::error::{MarathonError, MarathonResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A package a script depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package name (last URL path component without `.git`)
    pub name: String,
    /// Clone URL
    pub url: String,
    /// Newest released version when the package was added
    pub version: String,
}

/// The set of known packages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageRegistry {
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl PackageRegistry {
    /// Registry file inside a packages folder
    pub fn file_path(packages_dir: &Path) -> PathBuf {
        packages_dir.join("packages.json")
    }

    /// Load the registry, empty if the file does not exist yet
    pub async fn load(packages_dir: &Path) -> MarathonResult<Self> {
        let path = Self::file_path(packages_dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| MarathonError::io(format!("reading {}", path.display()), e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist the registry
    pub async fn save(&self, packages_dir: &Path) -> MarathonResult<()> {
        fs::create_dir_all(packages_dir).await.map_err(|e| {
            MarathonError::io(format!("creating {}", packages_dir.display()), e)
        })?;

        let path = Self::file_path(packages_dir);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)
            .await
            .map_err(|e| MarathonError::io(format!("writing {}", path.display()), e))
    }

    /// Look up a package by URL
    pub fn get(&self, url: &str) -> Option<&Package> {
        let url = normalize_url(url);
        self.packages.iter().find(|p| normalize_url(&p.url) == url)
    }

    /// Add or replace a package
    pub fn insert(&mut self, package: Package) {
        let url = normalize_url(&package.url).to_string();
        self.packages.retain(|p| normalize_url(&p.url) != url);
        self.packages.push(package);
    }
}

/// Compare URLs without a trailing slash
fn normalize_url(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Package name for a clone URL (`https://host/o/Files.git` -> `Files`)
pub fn package_name_from_url(url: &str) -> Option<String> {
    let last = normalize_url(url).rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn files() -> Package {
        Package {
            name: "Files".to_string(),
            url: "https://github.com/JohnSundell/Files.git".to_string(),
            version: "4.2.0".to_string(),
        }
    }

    #[test]
    fn name_from_url() {
        assert_eq!(
            package_name_from_url("https://github.com/JohnSundell/Files.git"),
            Some("Files".to_string())
        );
        assert_eq!(
            package_name_from_url("git@github.com:owner/Plot.git"),
            Some("Plot".to_string())
        );
        assert_eq!(
            package_name_from_url("https://host/owner/Ink/"),
            Some("Ink".to_string())
        );
        assert_eq!(package_name_from_url(""), None);
    }

    #[test]
    fn get_ignores_trailing_slash() {
        let mut registry = PackageRegistry::default();
        registry.insert(files());
        assert!(registry
            .get("https://github.com/JohnSundell/Files.git/")
            .is_some());
        assert!(registry.get("https://github.com/other/Files.git").is_none());
    }

    #[test]
    fn insert_replaces_same_url() {
        let mut registry = PackageRegistry::default();
        registry.insert(files());
        registry.insert(Package {
            version: "5.0.0".to_string(),
            ..files()
        });
        assert_eq!(registry.packages.len(), 1);
        assert_eq!(registry.packages[0].version, "5.0.0");
    }

    #[tokio::test]
    async fn save_and_load() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Packages");

        assert!(PackageRegistry::load(&dir).await.unwrap().packages.is_empty());

        let mut registry = PackageRegistry::default();
        registry.insert(files());
        registry.save(&dir).await.unwrap();

        let loaded = PackageRegistry::load(&dir).await.unwrap();
        assert_eq!(loaded.packages, vec![files()]);
    }
}
