//! Swift Package Manager backend
//!
//! Packages are recorded in `<root>/Packages/packages.json` together with the
//! newest semantic-version tag found by `git ls-remote`. Generated manifests
//! depend on each package `from:` that version, and every script shares
//! `<root>/Packages/.build` so checkouts are only fetched once.

use crate::error::{MarathonError, MarathonResult};
use crate::package::registry::{package_name_from_url, Package, PackageRegistry};
use crate::package::PackageManager;
use crate::remote::ProcessRunner;
use crate::script::store::create_symlink;
use async_trait::async_trait;
use semver::Version;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Manifest file name used by the Swift Package Manager
pub const MANIFEST_FILE: &str = "Package.swift";

/// Shared build folder linked into every script project
const BUILD_DIR: &str = ".build";

/// Package manager for Swift scripts
pub struct SwiftPackageManager {
    packages_dir: PathBuf,
    tools_version: String,
    runner: Arc<dyn ProcessRunner>,
}

impl SwiftPackageManager {
    /// Create a package manager storing its state under `<root>/Packages`
    pub fn new(
        root: &Path,
        tools_version: impl Into<String>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            packages_dir: root.join("Packages"),
            tools_version: tools_version.into(),
            runner,
        }
    }

    /// Folder holding the registry and shared build products
    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }

    async fn ensure_packages_dir(&self) -> MarathonResult<()> {
        fs::create_dir_all(&self.packages_dir).await.map_err(|e| {
            MarathonError::io(format!("creating {}", self.packages_dir.display()), e)
        })
    }

    /// Resolve the newest released version of the package at `url`
    async fn latest_version(&self, url: &str) -> MarathonResult<Version> {
        let output = self
            .runner
            .run("git", &["ls-remote", "--tags", "--refs", url], &self.packages_dir)
            .await
            .map_err(|e| MarathonError::FailedToAddPackage {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        latest_tag_version(&output).ok_or_else(|| MarathonError::FailedToAddPackage {
            url: url.to_string(),
            reason: "no semantic version tags found".to_string(),
        })
    }
}

#[async_trait]
impl PackageManager for SwiftPackageManager {
    async fn add_packages_if_needed(&self, urls: &[String]) -> MarathonResult<()> {
        if urls.is_empty() {
            return Ok(());
        }

        self.ensure_packages_dir().await?;
        let mut registry = PackageRegistry::load(&self.packages_dir).await?;
        let mut changed = false;

        let unique: BTreeSet<&str> = urls.iter().map(|u| u.trim()).collect();
        for url in unique {
            if registry.get(url).is_some() {
                debug!("Package already added: {}", url);
                continue;
            }

            let name = package_name_from_url(url).ok_or_else(|| MarathonError::FailedToAddPackage {
                url: url.to_string(),
                reason: "cannot derive a package name from the URL".to_string(),
            })?;
            let version = self.latest_version(url).await?;

            info!("Added package {} {} ({})", name, version, url);
            registry.insert(Package {
                name,
                url: url.to_string(),
                version: version.to_string(),
            });
            changed = true;
        }

        if changed {
            registry.save(&self.packages_dir).await?;
        }
        Ok(())
    }

    async fn name_of_package(&self, folder: &Path) -> MarathonResult<Option<String>> {
        let manifest = folder.join(MANIFEST_FILE);
        let content = match fs::read_to_string(&manifest).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(MarathonError::io(
                    format!("reading {}", manifest.display()),
                    e,
                ))
            }
        };

        Ok(parse_package_name(&content))
    }

    async fn make_package_description(
        &self,
        script_name: &str,
        urls: &[String],
    ) -> MarathonResult<String> {
        let registry = PackageRegistry::load(&self.packages_dir).await?;

        let mut packages = Vec::new();
        let unique: BTreeSet<&str> = urls.iter().map(|u| u.trim()).collect();
        for url in unique {
            let package = registry.get(url).ok_or_else(|| MarathonError::FailedToAddPackage {
                url: url.to_string(),
                reason: "package has not been added".to_string(),
            })?;
            packages.push(package);
        }
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(render_manifest(&self.tools_version, script_name, &packages))
    }

    async fn symlink_packages(&self, folder: &Path) -> MarathonResult<()> {
        let shared = self.packages_dir.join(BUILD_DIR);
        fs::create_dir_all(&shared)
            .await
            .map_err(|e| MarathonError::io(format!("creating {}", shared.display()), e))?;

        let link = folder.join(BUILD_DIR);
        if fs::symlink_metadata(&link).await.is_ok() {
            return Ok(());
        }

        create_symlink(&shared, &link)
            .await
            .map_err(|e| MarathonError::io(format!("linking {}", link.display()), e))?;
        debug!("Linked {} -> {}", link.display(), shared.display());
        Ok(())
    }
}

/// Highest version among `git ls-remote --tags` lines, preferring releases
/// over pre-releases.
fn latest_tag_version(ls_remote: &str) -> Option<Version> {
    let versions: Vec<Version> = ls_remote
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .filter_map(|r| r.strip_prefix("refs/tags/"))
        .filter(|tag| !tag.ends_with("^{}"))
        .filter_map(|tag| Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok())
        .collect();

    let stable = versions.iter().filter(|v| v.pre.is_empty()).max();
    stable.or_else(|| versions.iter().max()).cloned()
}

/// The `name:` argument of the top-level `Package(...)` call
fn parse_package_name(manifest: &str) -> Option<String> {
    let start = manifest.find("Package(")?;
    let rest = &manifest[start..];
    let after_label = &rest[rest.find("name:")? + "name:".len()..];
    let quoted = after_label.trim_start().strip_prefix('"')?;
    let name = &quoted[..quoted.find('"')?];
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn render_manifest(tools_version: &str, script_name: &str, packages: &[&Package]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// swift-tools-version:{}", tools_version);
    let _ = writeln!(out, "import PackageDescription");
    let _ = writeln!(out);
    let _ = writeln!(out, "let package = Package(");
    let _ = writeln!(out, "    name: \"{}\",", script_name);
    let _ = writeln!(out, "    dependencies: [");
    for package in packages {
        let _ = writeln!(
            out,
            "        .package(url: \"{}\", from: \"{}\"),",
            package.url, package.version
        );
    }
    let _ = writeln!(out, "    ],");
    let _ = writeln!(out, "    targets: [");
    let _ = writeln!(out, "        .executableTarget(");
    let _ = writeln!(out, "            name: \"{}\",", script_name);
    let _ = writeln!(out, "            dependencies: [");
    for package in packages {
        let _ = writeln!(
            out,
            "                .product(name: \"{0}\", package: \"{0}\"),",
            package.name
        );
    }
    let _ = writeln!(out, "            ],");
    let _ = writeln!(out, "            path: \"Sources/{}\"", script_name);
    let _ = writeln!(out, "        )");
    let _ = writeln!(out, "    ]");
    let _ = writeln!(out, ")");
    out
}
