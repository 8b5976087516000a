//! Tracker configuration: weight catalogs, initial users, round driving, logging.

use crate::error::RiskError;
use crate::risk::Weights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Category and severity weights
    pub weights: Weights,
    /// Users registered at startup
    pub users: Vec<String>,
    /// Optional JSON count table merged at startup
    pub counts_path: Option<PathBuf>,
    /// Random count generation before each round
    pub randomize: RandomizeConfig,
    /// Seconds between rounds; 0 runs a single round
    pub interval_secs: u64,
    /// Stop after this many rounds (loop mode only)
    pub rounds: Option<u64>,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizeConfig {
    pub enabled: bool,
    /// Upper bound (inclusive) of each generated count
    pub max_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            users: vec!["User1".to_string(), "User2".to_string(), "User3".to_string()],
            counts_path: None,
            randomize: RandomizeConfig::default(),
            interval_secs: 0,
            rounds: None,
            log: LogConfig::default(),
        }
    }
}

impl Default for RandomizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_count: 10,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl TrackerConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            if let Ok(c) = Self::try_load(path) {
                return c;
            }
        }
        Self::default()
    }

    pub fn try_load(path: &Path) -> Result<Self, RiskError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
