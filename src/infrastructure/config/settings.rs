//! Application configuration loading and validation.
//!
//! # Example
//!
//! ```no_run
//! use deploy_runtime::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("runtime.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::orchestrator::OrchestratorsConfig;
use super::scaling::ScalingConfig;
use crate::error::{ConfigError, Result};

/// Main runtime configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub orchestrators: OrchestratorsConfig,
    pub scaling: ScalingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.scaling.validate()?;
        Ok(())
    }

    /// Initialize the tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
