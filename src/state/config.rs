/// Preview configuration
///
/// Knobs for the network fetch and the icon search. Stored as JSON in the
/// user's config directory; a missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings used by the preview pipeline
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whole-request timeout for the screenshot download, in seconds
    pub fetch_timeout_secs: u64,

    /// TCP/TLS connect timeout, in seconds
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with the screenshot request
    pub user_agent: String,

    /// How deep below the metainfo directory to look for the icon
    /// (None = unlimited)
    pub max_icon_search_depth: Option<usize>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: concat!("metainfo-preview/", env!("CARGO_PKG_VERSION")).to_string(),
            max_icon_search_depth: None,
        }
    }
}

impl PreviewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Where the config file lives
    /// - Linux: ~/.config/metainfo-preview/config.json
    /// - macOS: ~/Library/Application Support/metainfo-preview/config.json
    /// - Windows: %APPDATA%\metainfo-preview\config.json
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("metainfo-preview");
        path.push("config.json");
        Some(path)
    }

    /// Load from `path`, falling back to defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(&json).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bound_the_fetch() {
        let config = PreviewConfig::new();
        assert_eq!(config.fetch_timeout_secs, 10);
        assert!(config.user_agent.starts_with("metainfo-preview/"));
        assert_eq!(config.max_icon_search_depth, None);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = PreviewConfig::from_json(r#"{ "fetch_timeout_secs": 3 }"#).unwrap();
        assert_eq!(config.fetch_timeout_secs, 3);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = PreviewConfig::default();
        config.max_icon_search_depth = Some(4);
        let json = config.to_json().unwrap();
        assert_eq!(PreviewConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PreviewConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, PreviewConfig::default());
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PreviewConfig::load(&path),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
