use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::ChatModel;

/// Top-level application configuration, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub session: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.config/mindmate/config.toml),
    /// falling back to defaults if the file doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Write current configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindmate")
            .join("config.toml")
    }

    /// Data directory for REPL history and other local state.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindmate")
    }
}

/// Wellness backend endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the MindMate API (auth, chat, mood routes).
    pub api_base: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".into(),
            timeout_secs: 30,
        }
    }
}

/// Chat session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Model used for new sessions until changed with `set_model`.
    pub default_model: ChatModel,
    /// Seed new sessions with the assistant greeting message.
    pub greeting: bool,
    /// User id supplied to the core when none is given on the command line.
    pub default_user: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_model: ChatModel::Fast,
            greeting: true,
            default_user: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("localhost:8000"));
        assert!(toml_str.contains("fast"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.backend.api_base, config.backend.api_base);
        assert_eq!(parsed.session.default_model, config.session.default_model);
        assert_eq!(parsed.session.greeting, config.session.greeting);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[backend]\napi_base = \"https://api.example.com\"\n\n[session]\ndefault_model = \"accurate\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.backend.api_base, "https://api.example.com");
        assert_eq!(config.session.default_model, ChatModel::Accurate);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.session.greeting);
    }
}
