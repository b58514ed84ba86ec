//! Configuration file support for the strength engine.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/strength/config.toml`
//! and aggregates the Direction, Magnitude, and Deload policy configs
//! plus the default load-rounding policy (spec §6).

use crate::deload::DeloadConfig;
use crate::direction::DirectionPolicyConfig;
use crate::error::Result;
use crate::load::RoundingPolicy;
use crate::magnitude::MagnitudePolicyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub direction: DirectionPolicyConfig,

    #[serde(default)]
    pub magnitude: MagnitudePolicyConfig,

    #[serde(default)]
    pub deload: DeloadConfig,

    #[serde(default)]
    pub rounding: RoundingPolicy,
}

/// Where the engine's consumer (the CLI) stores workout history.
/// Persistence itself is out of scope for the core engine (spec §1
/// non-goals); this only records where the consumer should look.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("strength")
}

impl Config {
    /// Load configuration from the standard config path, falling back
    /// to defaults if no file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "no config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("strength").join("config.toml")
    }

    /// Save the current configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        tracing::info!("saved config to {:?}", path);
        Ok(())
    }
}
