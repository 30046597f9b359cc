//! CLI configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use obligo_bonds::config::EngineConfig;
use obligo_ext_gus::GusConfig;

use crate::error::{CliError, CliResult};

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "obligo.toml";

/// Contents of `obligo.toml`. Every key is optional.
///
/// ```toml
/// storage_path = "./data/obligo.redb"
/// positions_file = "./data/positions.json"
///
/// [engine]
/// tax_rate = 0.19
/// fallback_months = 12
///
/// [engine.retry]
/// max_attempts = 5
/// delay_ms = 1000
///
/// [source]
/// timeout_secs = 30
/// pause_ms = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObligoConfig {
    /// Rate cache database
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    /// Portfolio positions (JSON)
    #[serde(default)]
    pub positions_file: Option<String>,

    /// Valuation engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Index source settings
    #[serde(default)]
    pub source: GusConfig,
}

fn default_storage_path() -> String {
    "./data/obligo.redb".to_string()
}

impl Default for ObligoConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            positions_file: None,
            engine: EngineConfig::default(),
            source: GusConfig::default(),
        }
    }
}

impl ObligoConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }

    /// Load the configuration in effect.
    ///
    /// An explicit path must exist. Otherwise `./obligo.toml`, then
    /// `<config dir>/obligo/obligo.toml`, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> CliResult<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::Config(format!("{} does not exist", path.display())));
            }
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        match discover() {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("obligo").join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
