use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Runtime configuration for the form controller and the HTTP backend.
///
/// Every field has a default, so a config file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL that relative endpoints are resolved against.
    pub base_url: String,
    pub schema_path: String,
    pub submit_path: String,
    /// Upper bound for a single option lookup. Expiry counts as a failed fetch.
    pub fetch_timeout_ms: u64,
    /// Upper bound for a submission. Expiry counts as a failed submit.
    pub submit_timeout_ms: u64,
    /// Key of the option array in option lookup responses.
    pub options_key: String,
    /// Drop answers of fields that are hidden at submit time from the payload.
    pub prune_hidden_answers: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://assignment.devotel.io".to_string(),
            schema_path: "/api/insurance/forms".to_string(),
            submit_path: "/api/insurance/forms/submit".to_string(),
            fetch_timeout_ms: 10_000,
            submit_timeout_ms: 10_000,
            options_key: "states".to_string(),
            prune_hidden_answers: false,
        }
    }
}

impl EngineConfig {
    /// Loads and validates a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        for (name, timeout) in [
            ("fetch_timeout_ms", self.fetch_timeout_ms),
            ("submit_timeout_ms", self.submit_timeout_ms),
        ] {
            if timeout == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        for (name, path) in [
            ("schema_path", &self.schema_path),
            ("submit_path", &self.submit_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "{} must start with '/', got '{}'",
                    name, path
                )));
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }
}
