//! Configuration schema for Marathon
//!
//! Configuration is stored at `~/.config/marathon/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Filesystem locations
    pub paths: PathsConfig,

    /// Remote script settings
    pub remote: RemoteConfig,

    /// Swift toolchain settings
    pub swift: SwiftConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root folder holding scripts and packages (defaults to ~/.marathon)
    pub root: Option<PathBuf>,
}

/// Remote script settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Allow URLs and repository shorthands as script references
    pub allow: bool,

    /// Host used to expand `owner/name` shorthands
    pub git_host: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            allow: true,
            git_host: "github.com".to_string(),
        }
    }
}

/// Swift toolchain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwiftConfig {
    /// `swift-tools-version` written into generated package manifests
    pub tools_version: String,
}

impl Default for SwiftConfig {
    fn default() -> Self {
        Self {
            tools_version: "5.5".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[remote]"));
        assert!(toml.contains("git_host = \"github.com\""));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.remote.allow);
        assert!(config.paths.root.is_none());
        assert_eq!(config.swift.tools_version, "5.5");
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
[paths]
root = "/opt/marathon"

[remote]
allow = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.paths.root, Some(PathBuf::from("/opt/marathon")));
        assert!(!config.remote.allow);
        assert_eq!(config.remote.git_host, "github.com");
        assert_eq!(config.general.log_format, "text");
    }
}
