//! Configuration file support for Quest.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/quest/config.toml`.

use crate::quotes::DEFAULT_QUOTES;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub motivation: MotivationConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Working ledger file name, relative to `data_dir`
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,

    /// Event journal file name, relative to `data_dir`
    #[serde(default = "default_journal_file")]
    pub journal_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            ledger_file: default_ledger_file(),
            journal_file: default_journal_file(),
        }
    }
}

/// Quotes shown after recording an event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotivationConfig {
    #[serde(default = "default_quotes")]
    pub quotes: Vec<String>,
}

impl Default for MotivationConfig {
    fn default() -> Self {
        Self {
            quotes: default_quotes(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("quest")
}

fn default_ledger_file() -> String {
    "goals.txt".into()
}

fn default_journal_file() -> String {
    "events.jsonl".into()
}

fn default_quotes() -> Vec<String> {
    DEFAULT_QUOTES.iter().map(|q| q.to_string()).collect()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("quest").join("config.toml")
    }

    /// Reject file names that would escape the data directory
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("data.ledger_file", &self.data.ledger_file),
            ("data.journal_file", &self.data.journal_file),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", key)));
            }
            if value.contains(['/', '\\']) {
                return Err(Error::Config(format!(
                    "{} must be a plain file name, got '{}'",
                    key, value
                )));
            }
        }
        Ok(())
    }

    /// Working ledger path inside a data directory
    pub fn ledger_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.data.ledger_file)
    }

    /// Event journal path inside a data directory
    pub fn journal_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.data.journal_file)
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
