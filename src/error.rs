//! Error types for Marathon
//!
//! All modules use `MarathonResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Marathon operations
pub type MarathonResult<T> = Result<T, MarathonError>;

/// All errors that can occur in Marathon
#[derive(Error, Debug)]
pub enum MarathonError {
    // Script resolution errors
    #[error("Could not find a Swift script at '{0}'")]
    ScriptNotFound(String),

    #[error("Remote scripts are not allowed here: '{0}'")]
    RemoteScriptNotAllowed(String),

    #[error("Invalid modifier '{modifier}' in script reference '{reference}'")]
    InvalidReferenceModifier { reference: String, modifier: String },

    #[error("Failed to download script from {url}: {reason}")]
    FailedToDownloadScript { url: String, reason: String },

    #[error("No Swift files found in repository {0}")]
    NoSwiftFilesInRepository(String),

    #[error("Multiple Swift files found in repository {url}")]
    MultipleSwiftFilesInRepository {
        url: String,
        branch: Option<String>,
        files: Vec<String>,
    },

    // Dependency errors
    #[error("Invalid inline dependency URL: '{0}'")]
    InvalidInlineDependencyUrl(String),

    #[error("Failed to add dependency script '{location}': {reason}")]
    FailedToAddDependencyScript { location: String, reason: String },

    #[error("Failed to create package file at {path}")]
    FailedToCreatePackageFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to add package {url}: {reason}")]
    FailedToAddPackage { url: String, reason: String },

    // Cache errors
    #[error("Failed to remove script folder {path}")]
    FailedToRemoveScriptFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarathonError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::ScriptNotFound(_) => {
                Some("Please check that the path is valid and try again".to_string())
            }
            Self::RemoteScriptNotAllowed(_) => Some(
                "Remote scripts can be resolved with 'marathon resolve <url>' unless --no-remote is set"
                    .to_string(),
            ),
            Self::InvalidReferenceModifier { .. } => Some(
                "The only supported modifier is 'branch:<name>', e.g. 'owner/repo,branch:dev'"
                    .to_string(),
            ),
            Self::FailedToDownloadScript { .. } => {
                Some("Make sure that the URL is reachable and try again".to_string())
            }
            Self::NoSwiftFilesInRepository(_) => {
                Some("Make sure that the repository contains at least one .swift file".to_string())
            }
            Self::MultipleSwiftFilesInRepository { url, branch, files } => {
                let base = browse_url(url);
                let branch = branch.as_deref().unwrap_or("master");
                let commands: Vec<String> = files
                    .iter()
                    .map(|file| format!("- marathon resolve {}/blob/{}/{}", base, branch, file))
                    .collect();
                Some(format!(
                    "Run one of the following commands to resolve a specific file:\n{}",
                    commands.join("\n")
                ))
            }
            Self::InvalidInlineDependencyUrl(_) => Some(
                "Inline dependencies look like: import Files // marathon:https://github.com/JohnSundell/Files.git"
                    .to_string(),
            ),
            Self::FailedToAddDependencyScript { .. } => {
                Some("Make sure the file exists and that you have read permission".to_string())
            }
            Self::FailedToCreatePackageFile { .. } | Self::FailedToRemoveScriptFolder { .. } => {
                Some("Make sure that you have write permission to the Marathon folder".to_string())
            }
            Self::FailedToAddPackage { .. } => Some(
                "Make sure that the package URL is a valid git repository with version tags"
                    .to_string(),
            ),
            Self::ConfigInvalid { .. } => Some("Run: marathon config init --force".to_string()),
            _ => None,
        }
    }
}

/// Web address of a clone URL: `git@host:path.git` becomes `https://host/path`
fn browse_url(url: &str) -> String {
    let base = url.trim_end_matches('/').trim_end_matches(".git");
    match base.strip_prefix("git@").and_then(|rest| rest.split_once(':')) {
        Some((host, path)) => format!("https://{}/{}", host, path),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MarathonError::ScriptNotFound("hello".to_string());
        assert!(err.to_string().contains("Could not find a Swift script"));
    }

    #[test]
    fn error_hint() {
        let err = MarathonError::ScriptNotFound("hello".to_string());
        assert_eq!(
            err.hint().as_deref(),
            Some("Please check that the path is valid and try again")
        );
        assert!(MarathonError::Internal("x".to_string()).hint().is_none());
    }

    #[test]
    fn multiple_files_hint_lists_candidates() {
        let err = MarathonError::MultipleSwiftFilesInRepository {
            url: "https://github.com/owner/repo.git".to_string(),
            branch: None,
            files: vec!["a.swift".to_string(), "Sources/b.swift".to_string()],
        };
        let hint = err.hint().unwrap();
        assert!(hint.contains("https://github.com/owner/repo/blob/master/a.swift"));
        assert!(hint.contains("https://github.com/owner/repo/blob/master/Sources/b.swift"));
    }

    #[test]
    fn multiple_files_hint_keeps_branch() {
        let err = MarathonError::MultipleSwiftFilesInRepository {
            url: "https://github.com/owner/repo.git".to_string(),
            branch: Some("dev".to_string()),
            files: vec!["a.swift".to_string()],
        };
        let hint = err.hint().unwrap();
        let command = "- marathon resolve https://github.com/owner/repo/blob/dev/a.swift";
        assert!(hint.contains(command));
        assert!(!hint.contains("/blob/master/"));
    }

    #[test]
    fn multiple_files_hint_rewrites_ssh_url() {
        let err = MarathonError::MultipleSwiftFilesInRepository {
            url: "git@github.com:owner/repo.git".to_string(),
            branch: None,
            files: vec!["a.swift".to_string()],
        };
        let hint = err.hint().unwrap();
        let command = "- marathon resolve https://github.com/owner/repo/blob/master/a.swift";
        assert!(hint.contains(command));
        assert!(!hint.contains("git@"));
    }
}
