//! Host preferences loaded from `spotter.yaml`, with environment overrides.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::solver::export::ExportPrefs;
use crate::solver::FinderPrefs;
use crate::utility::UtilityPrefs;

pub const DEFAULT_CONFIG_PATH: &str = "spotter.yaml";
pub const DEFAULT_STORE_DIR: &str = "data/spotter";
pub const DEFAULT_USER_KEY: &str = "local";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotterConfig {
    pub store_dir: String,
    pub user_key: String,
    pub finder: FinderPrefs,
    pub export: ExportPrefs,
    pub utility: UtilityPrefs,
}

impl Default for SpotterConfig {
    fn default() -> Self {
        Self {
            store_dir: DEFAULT_STORE_DIR.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
            finder: FinderPrefs::default(),
            export: ExportPrefs::default(),
            utility: UtilityPrefs::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config YAML: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn parse_config(raw: &str) -> Result<SpotterConfig, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(SpotterConfig::default());
    }
    serde_yaml::from_str(raw).map_err(ConfigError::Parse)
}

/// Missing file means defaults; a present but malformed file is an error.
pub fn load_config(path: &str) -> Result<SpotterConfig, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(SpotterConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(ConfigError::Read)?;
    parse_config(&raw)
}

impl SpotterConfig {
    /// Apply `SPOTTER_STORE_DIR` and `SPOTTER_USER` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = non_empty_var("SPOTTER_STORE_DIR") {
            self.store_dir = dir;
        }
        if let Some(user) = non_empty_var("SPOTTER_USER") {
            self.user_key = user;
        }
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Config path from `SPOTTER_CONFIG`, falling back to [DEFAULT_CONFIG_PATH].
pub fn resolve_config_path() -> String {
    non_empty_var("SPOTTER_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}
