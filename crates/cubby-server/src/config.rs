//! Configuration for cubbyd.
//!
//! Loaded from `~/.config/cubby/cubbyd.toml` (platform equivalent) or an
//! explicit `--config` path. Every field has a default, so a missing
//! file just means a local setup under the working directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Top-level daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubbyConfig {
    /// Address to bind, e.g. "127.0.0.1:8080".
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Base storage directory; each identity gets a subtree below it.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// User registry file.
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,

    /// Session token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Voice helper process settings.
    #[serde(default)]
    pub voice: VoiceConfig,
}

/// External voice-recognition helper settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Helper command and arguments. Empty means no helper is installed.
    #[serde(default)]
    pub command: Vec<String>,

    /// Status file the helper writes and `/voice/status` reads.
    #[serde(default = "default_voice_status_file")]
    pub status_file: PathBuf,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("cubby-data/storage")
}

fn default_users_file() -> PathBuf {
    PathBuf::from("cubby-data/users.json")
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_voice_status_file() -> PathBuf {
    PathBuf::from("cubby-data/voice-status.txt")
}

impl Default for CubbyConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            storage_dir: default_storage_dir(),
            users_file: default_users_file(),
            token_ttl_secs: default_token_ttl_secs(),
            voice: VoiceConfig::default(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            status_file: default_voice_status_file(),
        }
    }
}

impl CubbyConfig {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the default config file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs =
            ProjectDirs::from("", "", "cubby").context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("cubbyd.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: CubbyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.token_ttl_secs, 3600);
        assert!(config.voice.command.is_empty());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config: CubbyConfig = toml::from_str(
            r#"
            listen_addr = "0.0.0.0:9000"

            [voice]
            command = ["python3", "helper.py"]
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.voice.command, vec!["python3", "helper.py"]);
        assert_eq!(config.storage_dir, PathBuf::from("cubby-data/storage"));
        assert_eq!(
            config.voice.status_file,
            PathBuf::from("cubby-data/voice-status.txt")
        );
    }
}
