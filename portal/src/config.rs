//! Portal configuration with TOML file support.

use relief_crypto::{Argon2PinHasher, HashParams};
use relief_rest::{RestBackend, RestConfig};
use relief_store::StoreError;
use relief_utils::{init_tracing_with, LogFormat, LoggingError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Configuration for a portal deployment.
///
/// Can be loaded from a TOML file via [`PortalConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Upper bound on any single backend call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on a single audit write, in milliseconds. Audit writes
    /// never fail the operation they record, so this is kept short.
    #[serde(default = "default_audit_timeout_millis")]
    pub audit_timeout_millis: u64,

    /// How long success notices stay visible, in milliseconds.
    #[serde(default = "default_notice_duration_millis")]
    pub notice_duration_millis: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Backend service connection.
    #[serde(default)]
    pub backend: RestConfig,

    /// Argon2id cost for newly created PINs.
    #[serde(default)]
    pub pin_hash: HashParams,
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_audit_timeout_millis() -> u64 {
    2_000
}

fn default_notice_duration_millis() -> u64 {
    3_000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Timing knobs the session needs at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub request_timeout: Duration,
    pub audit_timeout: Duration,
    pub notice_duration: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
            audit_timeout: Duration::from_millis(default_audit_timeout_millis()),
            notice_duration: Duration::from_millis(default_notice_duration_millis()),
        }
    }
}

impl PortalConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            audit_timeout: Duration::from_millis(self.audit_timeout_millis),
            notice_duration: Duration::from_millis(self.notice_duration_millis),
        }
    }

    pub fn rest_backend(&self) -> Result<RestBackend, StoreError> {
        RestBackend::new(&self.backend)
    }

    pub fn pin_hasher(&self) -> Argon2PinHasher {
        Argon2PinHasher::new(self.pin_hash)
    }

    /// Install the global tracing subscriber.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        init_tracing_with(&self.log_level, self.log_format)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            backend: RestConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
            audit_timeout_millis: default_audit_timeout_millis(),
            notice_duration_millis: default_notice_duration_millis(),
            pin_hash: HashParams::default(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}
