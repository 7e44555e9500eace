//! Loop configuration.
//!
//! Loaded from an explicit path, `.loopctl.yml`, or ~/.config/loopctl/loopctl.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoopError;

/// Default number of elements between cooperative yields.
pub const DEFAULT_YIELD_EVERY: u32 = 64;

/// Per-loop engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoopConfig {
    /// Identifier used in log events. Generated when absent.
    pub name: Option<String>,

    /// Yield the engine task back to the runtime after this many elements.
    /// Zero disables yielding.
    pub yield_every: u32,

    /// Emit a trace event for every element delivered to the chain.
    pub trace_elements: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            name: None,
            yield_every: DEFAULT_YIELD_EVERY,
            trace_elements: false,
        }
    }
}

impl LoopConfig {
    /// Config with a fixed loop name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .loopctl.yml in current directory
    /// 3. ~/.config/loopctl/loopctl.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(".loopctl.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .loopctl.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .loopctl.yml: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("loopctl").join("loopctl.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), LoopError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(LoopError::Config("name must not be empty".to_string()));
        }
        Ok(())
    }
}
