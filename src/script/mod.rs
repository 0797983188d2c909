//! Script references, the cache and resolution
//!
//! - `reference`: classify raw references
//! - `identifier`: cache identifiers and display names
//! - `store`: the `Scripts/Cache` folders
//! - `marathonfile` / `dependencies`: dependency discovery
//! - `materialize`: `Package.swift` generation
//! - `resolver`: orchestration

pub mod dependencies;
pub mod identifier;
pub mod marathonfile;
pub mod materialize;
pub mod reference;
pub mod resolver;
pub mod staging;
pub mod store;

pub use identifier::{derive_identifier, display_name};
pub use reference::{classify, ClassifyOptions, ScriptSource};
pub use resolver::{ResolvedScript, ScriptResolver};
pub use store::{CacheStore, ManagedScript};

/// Receives progress messages during resolution
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str);
}

/// Reporter that discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _message: &str) {}
}
