use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{game_config::GameConfig, paths::ProjectPaths, server_config::ServerConfig};

#[derive(Debug)]
pub enum ConfigLoadError {
    NotFound,
    ParseError(String),
    IoError(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::NotFound => write!(f, "Config file not found"),
            ConfigLoadError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigLoadError::IoError(msg) => write!(f, "IO error reading config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaverConfig {
    /// Layout server for online sessions; omit for offline-only play
    #[serde(default)]
    pub server: Option<ServerConfig>,

    /// Offline generation tunables
    #[serde(default)]
    pub game: GameConfig,
}

impl WeaverConfig {
    pub fn config_path() -> PathBuf {
        let proj_paths = ProjectPaths::new("weaver").expect("Failed to determine config directory");
        proj_paths.config_dir().join("config.toml")
    }

    pub fn load() -> Result<Self, ConfigLoadError> {
        let path = Self::config_path();

        if !path.exists() {
            return Err(ConfigLoadError::NotFound);
        }

        let content =
            fs::read_to_string(&path).map_err(|e| ConfigLoadError::IoError(e.to_string()))?;
        let config =
            toml::from_str(&content).map_err(|e| ConfigLoadError::ParseError(e.to_string()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config file, falling back to defaults so a missing or broken
    /// file always yields a working offline game
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(ConfigLoadError::NotFound) => Self::default(),
            Err(e) => {
                warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path();

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self)?;
        fs::write(&path, content)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }
}
