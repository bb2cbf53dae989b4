//! Configuration for the duescout host.
//!
//! Stored as TOML at [`ScoutConfig::default_config_path`]. Every section
//! and field has a default, so a partial file (or none at all) is valid.

use std::path::{Path, PathBuf};

use duescout_extract::ExtractConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Extraction engine settings.
    pub extract: ExtractConfig,
    /// Task tracker submission settings.
    pub submit: SubmitConfig,
}

/// Where and how extracted tasks are submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// URL that accepts a JSON task per POST. Submission is disabled when
    /// unset.
    pub endpoint: Option<String>,
    /// Bearer token sent in the `Authorization` header.
    pub api_key: Option<String>,
    /// Initial status given to new tasks.
    pub status: String,
    /// Priority given to new tasks.
    pub priority: String,
    /// Labels attached to every submitted task.
    pub labels: Vec<String>,
    /// Per-request timeout.
    pub timeout_seconds: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            status: "todo".to_owned(),
            priority: "medium".to_owned(),
            labels: vec!["school".to_owned()],
            timeout_seconds: 30,
        }
    }
}

impl SubmitConfig {
    /// Validates the submission settings.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] if the timeout is zero, the status is
    /// blank, or the endpoint is set but not an `http`/`https` URL.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(ScoutError::Config(
                "submit.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.status.trim().is_empty() {
            return Err(ScoutError::Config("submit.status must not be empty".into()));
        }
        if let Some(endpoint) = &self.endpoint {
            let url = url::Url::parse(endpoint)
                .map_err(|e| ScoutError::Config(format!("submit.endpoint {endpoint:?}: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ScoutError::Config(format!(
                    "submit.endpoint must use http or https, got {}",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }
}

impl ScoutConfig {
    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Extract`] for an invalid `[extract]` section and
    /// [`ScoutError::Config`] for an invalid `[submit]` section.
    pub fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        self.submit.validate()
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Pretty TOML rendering of this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Config`] if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Returns the default config file path: `~/.config/duescout/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("duescout").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("duescout")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/duescout-config/config.toml")
        }
    }
}
