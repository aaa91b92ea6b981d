//! RON configuration loader
//!
//! Loads `config.ron` from the platform config directory, falling back to
//! defaults when the file is missing or unreadable.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lua::LuaProvider;
use super::provider::{EnemyProvider, FallbackProvider};

const CONFIG_FILE: &str = "config.ron";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Language passed to content providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "ZH")]
    Zh,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Zh => "ZH",
        }
    }
}

/// Which enemy provider to run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    #[default]
    Fallback,
    Lua { script: PathBuf },
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub language: Language,
    /// Fixed RNG seed; random when absent
    pub rng_seed: Option<u64>,
    pub provider: ProviderKind,
    /// Generation requests older than this resolve to the fallback enemy
    pub provider_timeout_ms: u64,
    /// Passive tile tick interval
    pub passive_tick_ms: u64,
    /// Townsfolk wander tick interval
    pub npc_wander_ms: u64,
    /// Override for the save directory
    pub save_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            language: Language::En,
            rng_seed: None,
            provider: ProviderKind::Fallback,
            provider_timeout_ms: 15_000,
            passive_tick_ms: 1_000,
            npc_wander_ms: 2_000,
            save_dir: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "turkeyquest", "TurkeyQuest")
}

/// Platform config directory
pub fn config_directory() -> PathBuf {
    project_dirs()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./config"))
}

/// Platform data directory used for saves and logs
pub fn data_directory() -> PathBuf {
    project_dirs()
        .map(|d| d.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl GameConfig {
    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_or_init(&config_directory().join(CONFIG_FILE))
    }

    /// Load `path`. A missing file is created with the defaults so there is
    /// something to edit on the next run.
    pub fn load_or_init(path: &Path) -> Self {
        if !path.exists() {
            match Self::export_default(path) {
                Ok(()) => log::info!("No config found, wrote defaults to {}", path.display()),
                Err(e) => log::warn!("No config found and {} could not be written: {}", path.display(), e),
            }
            return Self::default();
        }
        Self::load_from(path).unwrap_or_else(|e| {
            log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = ron::from_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the default configuration for hand editing
    pub fn export_default(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(&Self::default(), ron::ser::PrettyConfig::default())?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn passive_tick(&self) -> Duration {
        Duration::from_millis(self.passive_tick_ms.max(1))
    }

    pub fn npc_wander(&self) -> Duration {
        Duration::from_millis(self.npc_wander_ms.max(1))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Directory holding the save slots
    pub fn save_directory(&self) -> PathBuf {
        self.save_dir
            .clone()
            .unwrap_or_else(|| data_directory().join("saves"))
    }

    /// Build the configured provider; a script that fails to load falls back
    pub fn build_provider(&self) -> Box<dyn EnemyProvider> {
        match &self.provider {
            ProviderKind::Fallback => Box::new(FallbackProvider),
            ProviderKind::Lua { script } => match LuaProvider::from_file(script) {
                Ok(provider) => Box::new(provider),
                Err(e) => {
                    log::warn!("Failed to load {}: {}. Using fallback enemies.", script.display(), e);
                    Box::new(FallbackProvider)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_and_load_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        GameConfig::export_default(&path).unwrap();
        let loaded = GameConfig::load_from(&path).unwrap();
        assert_eq!(loaded, GameConfig::default());
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("turkey").join(CONFIG_FILE);
        assert_eq!(GameConfig::load_or_init(&path), GameConfig::default());
        assert!(path.exists());

        fs::write(&path, "(rng_seed: Some(9))").unwrap();
        assert_eq!(GameConfig::load_or_init(&path).rng_seed, Some(9));

        fs::write(&path, "(rng_seed: ").unwrap();
        assert_eq!(GameConfig::load_or_init(&path), GameConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(language: ZH, passive_tick_ms: 250, provider: Lua(script: \"x.lua\"))").unwrap();
        let config = GameConfig::load_from(&path).unwrap();
        assert_eq!(config.language, Language::Zh);
        assert_eq!(config.passive_tick(), Duration::from_millis(250));
        assert_eq!(config.npc_wander_ms, 2_000);
        assert_eq!(config.provider, ProviderKind::Lua { script: PathBuf::from("x.lua") });
    }

    #[test]
    fn test_malformed_config_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(language: ").unwrap();
        assert!(matches!(GameConfig::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_script_falls_back() {
        let config = GameConfig {
            provider: ProviderKind::Lua { script: PathBuf::from("/nonexistent/enemies.lua") },
            ..Default::default()
        };
        assert_eq!(config.build_provider().name(), "fallback");
    }
}
