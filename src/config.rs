//! Configuration management for qradar-health
//!
//! The fetcher never reads configuration directly. It talks to a
//! [`ConnectionProvider`], which supplies the QRadar host, the
//! authentication headers and the TLS verification policy. [`Config`] is
//! the YAML-file backed provider used by the binary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header carrying the QRadar authorized service token
pub const SEC_HEADER: &str = "SEC";

/// Header selecting the QRadar REST API version
pub const VERSION_HEADER: &str = "Version";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Connection settings read once per invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QradarSettings {
    /// Target host address (`ip_QRadar`), optionally with a port
    pub ip_qradar: Option<String>,

    /// Request timeout in milliseconds; `None` keeps the HTTP client default
    pub timeout_ms: Option<u64>,
}

impl QradarSettings {
    /// Host to connect to, or an empty string when none is configured
    ///
    /// An empty host is passed through on purpose: it produces an invalid
    /// URL which is reported as a request failure.
    pub fn host(&self) -> &str {
        self.ip_qradar.as_deref().unwrap_or_default()
    }
}

/// TLS certificate verification policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOption {
    /// Verify against the built-in root store
    Enabled,
    /// Accept any certificate
    Disabled,
    /// Verify against an additional PEM CA bundle
    CaBundle(PathBuf),
}

/// Source of connection details for the metrics fetcher
pub trait ConnectionProvider {
    /// Configuration mapping; must expose the target host
    fn read_config(&self) -> QradarSettings;

    /// HTTP headers sufficient for an authenticated request
    fn qradar_headers(&self) -> BTreeMap<String, String>;

    /// Whether and how TLS certificates are verified
    fn verify_option(&self) -> VerifyOption;
}

/// `verify_ssl` as written in the config file: a boolean or a CA path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerifySetting {
    /// `true` / `false`
    Flag(bool),
    /// Path to a PEM CA bundle
    CaBundle(PathBuf),
}

impl Default for VerifySetting {
    fn default() -> Self {
        VerifySetting::Flag(true)
    }
}

impl From<&VerifySetting> for VerifyOption {
    fn from(setting: &VerifySetting) -> Self {
        match setting {
            VerifySetting::Flag(true) => VerifyOption::Enabled,
            VerifySetting::Flag(false) => VerifyOption::Disabled,
            VerifySetting::CaBundle(path) => VerifyOption::CaBundle(path.clone()),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// QRadar console host (`ip_QRadar`)
    #[serde(rename = "ip_QRadar", default)]
    pub ip_qradar: Option<String>,

    /// Authorized service token, sent as the `SEC` header
    #[serde(default)]
    pub auth_token: Option<String>,

    /// REST API version, sent as the `Version` header
    #[serde(default)]
    pub api_version: Option<String>,

    /// TLS verification: `true`, `false` or a CA bundle path
    #[serde(default)]
    pub verify_ssl: VerifySetting,

    /// Request timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    /// A missing `ip_QRadar` is not an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }

        if let VerifySetting::CaBundle(path) = &self.verify_ssl {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "verify_ssl must be a boolean or a non-empty CA bundle path".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl ConnectionProvider for Config {
    fn read_config(&self) -> QradarSettings {
        QradarSettings {
            ip_qradar: self.ip_qradar.clone(),
            timeout_ms: self.timeout_ms,
        }
    }

    fn qradar_headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        if let Some(token) = &self.auth_token {
            headers.insert(SEC_HEADER.to_string(), token.clone());
        }
        if let Some(version) = &self.api_version {
            headers.insert(VERSION_HEADER.to_string(), version.clone());
        }

        headers
    }

    fn verify_option(&self) -> VerifyOption {
        VerifyOption::from(&self.verify_ssl)
    }
}
