//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Marathon - resolve and cache Swift scripts
///
/// Turns a script file, URL or repository into a Swift package with its
/// dependencies declared, cached by reference.
#[derive(Parser, Debug)]
#[command(name = "marathon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MARATHON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Folder holding the script cache and packages
    #[arg(long, global = true, env = "MARATHON_PATH")]
    pub path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a script into a cached package
    Resolve(ResolveArgs),

    /// List cached scripts
    List(ListArgs),

    /// Remove cached scripts
    Remove(RemoveArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Path, URL or owner/repo (with optional ",branch:<name>")
    pub reference: String,

    /// Only accept local files
    #[arg(long)]
    pub no_remote: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["references", "all"])))]
pub struct RemoveArgs {
    /// Script paths whose cache entries should be removed
    pub references: Vec<String>,

    /// Remove every cached script
    #[arg(long, conflicts_with = "references")]
    pub all: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for the list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// One original path per line
    Plain,
}
