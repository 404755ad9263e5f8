use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CodemarkError, Result};

/// Which evaluator runs bookmark code bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorChoice {
    /// Sandboxed interpreter for the restricted statement language
    Script,
    /// Shell execution; requires `allow_native: true`
    Native,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_evaluator")]
    pub evaluator: EvaluatorChoice,

    /// Capability gate for the native evaluator. Off by default: native
    /// execution runs administrator-authored code with the full privilege
    /// of this process.
    #[serde(default)]
    pub allow_native: bool,

    /// Shell used by the native evaluator
    #[serde(default = "default_shell")]
    pub shell: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            evaluator: default_evaluator(),
            allow_native: false,
            shell: default_shell(),
        }
    }
}

fn default_evaluator() -> EvaluatorChoice {
    EvaluatorChoice::Script
}

fn default_shell() -> String {
    "/bin/sh".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config =
            serde_yaml::from_str(&contents).map_err(|e| CodemarkError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from the default location
    /// (`$XDG_CONFIG_HOME/codemark/config.yml`).
    /// Falls back to default config if the file doesn't exist or is broken.
    pub fn load() -> Self {
        let config_path = crate::utils::get_config_dir().join("config.yml");

        if config_path.exists() {
            match Self::load_from_path(&config_path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to load config from {:?}: {}",
                        config_path, e
                    );
                    eprintln!("Using default configuration");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml =
            serde_yaml::to_string(self).map_err(|e| CodemarkError::Config(e.to_string()))?;
        fs::write(path, yaml)?;
        Ok(())
    }
}
