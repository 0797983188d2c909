//! CLI command implementations

pub mod completions;
pub mod config;
pub mod list;
pub mod remove;
pub mod resolve;

pub use completions::execute as completions;
pub use config::execute as config;
pub use list::execute as list;
pub use remove::execute as remove;
pub use resolve::execute as resolve;
