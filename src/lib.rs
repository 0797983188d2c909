//! Marathon - Swift script resolution and caching
//!
//! Resolves a script reference (file, URL or repository) into a Swift
//! package under `~/.marathon/Scripts/Cache`, with its dependencies
//! declared in a generated `Package.swift`.

pub mod cli;
pub mod config;
pub mod error;
pub mod package;
pub mod remote;
pub mod script;
pub mod ui;

pub use error::{MarathonError, MarathonResult};
