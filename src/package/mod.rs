//! Package manager integration
//!
//! The resolver talks to the package manager through [`PackageManager`].
//! [`SwiftPackageManager`] keeps a registry of added packages and renders
//! `Package.swift` manifests for the Swift Package Manager.

pub mod registry;
pub mod swift;

pub use registry::{Package, PackageRegistry};
pub use swift::SwiftPackageManager;

use crate::error::MarathonResult;
use async_trait::async_trait;
use std::path::Path;

/// Operations the resolver needs from a package manager
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Make sure every package URL is known, adding the missing ones
    async fn add_packages_if_needed(&self, urls: &[String]) -> MarathonResult<()>;

    /// Name declared by the package manifest in `folder`, if there is one
    async fn name_of_package(&self, folder: &Path) -> MarathonResult<Option<String>>;

    /// Manifest text for a script named `script_name` depending on `urls`
    async fn make_package_description(
        &self,
        script_name: &str,
        urls: &[String],
    ) -> MarathonResult<String>;

    /// Share package checkouts and build products with the project in `folder`
    async fn symlink_packages(&self, folder: &Path) -> MarathonResult<()>;
}
