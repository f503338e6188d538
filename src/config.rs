//! Simulator configuration, loaded from YAML or JSON.
//!
//! Every field is optional, missing ones take their default.
//!
//! ```yaml
//! clock_speed: 1
//! ram_fix_mode: true
//! latch_mode: edge_triggered
//! max_iterations: 10000
//! max_resimulations: 50
//! log_level: info
//! program: fibonacci
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::programs::Program;
use crate::sim::{LatchMode, DEFAULT_MAX_ITERATIONS};

/// Default number of resimulations a settle may take.
pub const DEFAULT_STABLE_MAX: usize = 50;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown file format: {0}")]
    UnknownFormat(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parameters of a [Simulator](crate::sim::Simulator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Clock speed, 0 stops the clock, 1 toggles it on every tick
    #[serde(default = "default_clock_speed")]
    pub clock_speed: u32,

    /// Whether the RAM ignores writes to address 0 and writes of 0
    #[serde(default = "default_ram_fix_mode")]
    pub ram_fix_mode: bool,

    #[serde(default)]
    pub latch_mode: LatchMode,

    /// Propagation iterations allowed per resimulation
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Resimulations allowed per settle
    #[serde(default = "default_max_resimulations")]
    pub max_resimulations: usize,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Name of the program loaded at startup
    #[serde(default)]
    pub program: Option<String>,
}

fn default_clock_speed() -> u32 {
    1
}

fn default_ram_fix_mode() -> bool {
    true
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_max_resimulations() -> usize {
    DEFAULT_STABLE_MAX
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            clock_speed: default_clock_speed(),
            ram_fix_mode: default_ram_fix_mode(),
            latch_mode: LatchMode::default(),
            max_iterations: default_max_iterations(),
            max_resimulations: default_max_resimulations(),
            log_level: default_log_level(),
            program: None,
        }
    }
}

impl SimConfig {
    /// Loads configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, auto-detecting format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(ConfigError::UnknownFormat(ext.to_string())),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_iterations == 0 {
            return Err(ConfigError::Validation(
                "max_iterations must be positive".to_string(),
            ));
        }
        if self.max_resimulations == 0 {
            return Err(ConfigError::Validation(
                "max_resimulations must be positive".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level: {}",
                self.log_level
            )));
        }
        if let Some(name) = &self.program {
            if name.parse::<Program>().is_err() {
                return Err(ConfigError::Validation(format!(
                    "Unknown program: {}",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Returns the startup program, [None] if there is none or its name is unknown.
    pub fn program(&self) -> Option<Program> {
        self.program.as_ref()?.parse().ok()
    }

    /// Saves configuration to a YAML file.
    pub fn to_yaml_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Saves configuration to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
