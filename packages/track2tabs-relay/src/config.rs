//! Relay configuration
//!
//! Settings come from an optional YAML file; every key is optional and falls back to
//! the defaults below. Command-line flags are applied on top by the binary.
//!
//! ```yaml
//! bind: 0.0.0.0:3000
//! backend_url: http://localhost:8000/chords
//! upload_path: /api/upload
//! max_body_bytes: 26214400
//! timeout_secs: 120
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Encoded request bodies up to 25 MiB are accepted.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/chords";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Invalid config file: {0}")]
    Parse(String),

    #[error("Invalid backend URL '{url}': {message}")]
    BackendUrl { url: String, message: String },

    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("Could not build HTTP client: {0}")]
    Client(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// Address the relay listens on.
    pub bind: SocketAddr,
    /// Full URL of the backend's chord detection endpoint.
    pub backend_url: String,
    /// Route of the upload endpoint.
    pub upload_path: String,
    /// Largest accepted request body, in bytes of encoded JSON.
    pub max_body_bytes: usize,
    /// Upper bound on one backend round trip.
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            upload_path: "/api/upload".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            timeout_secs: 120,
        }
    }
}

impl RelayConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid "all defaults" config.
        if yaml.trim().is_empty() {
            return Ok(RelayConfig::default());
        }
        let config: RelayConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        RelayConfig::from_yaml_str(&yaml)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.backend_url).map_err(|e| ConfigError::BackendUrl {
            url: self.backend_url.clone(),
            message: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::BackendUrl {
                url: self.backend_url.clone(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if !self.upload_path.starts_with('/') || self.upload_path == "/" {
            return Err(ConfigError::Invalid(format!(
                "upload_path must start with '/' and not be the root, got '{}'",
                self.upload_path
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be positive".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
