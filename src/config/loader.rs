use crate::config::types::{RunnerError, Result, DEFAULT_OUTPUT_MODE};
/// Configuration loading from procrun.json
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "procrun.json";

/// Runner settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Interpreter used by the shell-mediated runner, invoked as `<shell> -c <command>`
    pub shell: PathBuf,
    /// Permission bits for created redirect targets (subject to umask)
    pub output_mode: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from("/bin/sh"),
            output_mode: DEFAULT_OUTPUT_MODE,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_content = std::fs::read_to_string(path).map_err(|e| {
            RunnerError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&config_content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: RunnerConfig = serde_json::from_str(content)
            .map_err(|e| RunnerError::Config(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load ./procrun.json if present, otherwise fall back to defaults
    pub fn load_default() -> Result<Self> {
        let config_path = std::env::current_dir()
            .map_err(|e| RunnerError::Config(format!("Failed to get current directory: {}", e)))?
            .join(DEFAULT_CONFIG_FILE);

        if !config_path.exists() {
            log::debug!("{} not found, using built-in defaults", DEFAULT_CONFIG_FILE);
            return Ok(Self::default());
        }

        Self::load_from_file(config_path)
    }

    fn validate(&self) -> Result<()> {
        if !self.shell.is_absolute() {
            return Err(RunnerError::Config(format!(
                "shell must be an absolute path, got {}",
                self.shell.display()
            )));
        }
        if self.output_mode > 0o7777 {
            return Err(RunnerError::Config(format!(
                "output_mode {:o} is not a valid permission mask",
                self.output_mode
            )));
        }
        Ok(())
    }
}
