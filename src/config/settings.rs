//! The settings bag the builder writes into.
//!
//! # Responsibilities
//! - Store string key/value pairs before a host is built
//! - Seed values from `WEBHOST_*` environment variables
//! - Overlay recognised keys onto a `HostConfig`
//!
//! # Design Decisions
//! - Keys are case-insensitive; underscores are ignored so that
//!   `WEBHOST_CAPTURE_STARTUP_ERRORS` and `captureStartupErrors` meet
//! - Unknown keys are kept, not rejected
//! - Values stay strings until `apply_to` parses them
//! - `shutdownTimeoutMilliseconds` wins over `shutdownTimeoutSeconds`

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::loader::ConfigError;
use crate::config::schema::HostConfig;
use crate::error::HostError;

/// Recognised setting keys.
pub mod keys {
    pub const APPLICATION_NAME: &str = "applicationName";
    pub const CAPTURE_STARTUP_ERRORS: &str = "captureStartupErrors";
    pub const CONTENT_ROOT: &str = "contentRoot";
    pub const ENVIRONMENT: &str = "environment";
    pub const SERVER: &str = "server";
    pub const SHUTDOWN_TIMEOUT_MILLISECONDS: &str = "shutdownTimeoutMilliseconds";
    pub const SHUTDOWN_TIMEOUT_SECONDS: &str = "shutdownTimeoutSeconds";
    pub const STARTUP_ASSEMBLY: &str = "startupAssembly";
    pub const URLS: &str = "urls";
    pub const WEB_ROOT: &str = "webroot";
}

/// Prefix of environment variables read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "WEBHOST_";

/// String key/value settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<&mut Self, HostError> {
        let normalized = normalize_key(key.trim());
        if normalized.is_empty() {
            return Err(HostError::invalid_argument("key", "setting key must not be empty"));
        }
        self.values.insert(normalized, value.into());
        Ok(self)
    }

    /// Set one of the recognised `keys`.
    pub(crate) fn insert(&mut self, key: &'static str, value: String) {
        self.values.insert(normalize_key(key), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy every value of `other` into `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Settings) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Collect the `WEBHOST_*` entries of an environment listing.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut settings = Settings::new();
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = normalize_key(key);
            if !key.is_empty() {
                settings.values.insert(key, value);
            }
        }
        settings
    }

    /// Settings from the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Overlay the recognised keys onto `config`.
    pub fn apply_to(&self, config: &mut HostConfig) -> Result<(), ConfigError> {
        if let Some(value) = self.get(keys::APPLICATION_NAME) {
            config.application_name = Some(value.to_string());
        }
        if let Some(value) = self.get(keys::ENVIRONMENT) {
            config.environment = value.trim().to_string();
        }
        if let Some(value) = self.get(keys::URLS) {
            config.urls = split_urls(value);
        }
        if let Some(value) = self.get(keys::CONTENT_ROOT) {
            config.content_root = Some(PathBuf::from(value));
        }
        if let Some(value) = self.get(keys::WEB_ROOT) {
            config.web_root = Some(PathBuf::from(value));
        }
        if let Some(value) = self.get(keys::SERVER) {
            config.server = value.trim().to_string();
        }
        if let Some(value) = self.get(keys::STARTUP_ASSEMBLY) {
            config.startup_assembly = Some(value.to_string());
        }
        if let Some(value) = self.get(keys::CAPTURE_STARTUP_ERRORS) {
            config.capture_startup_errors = parse_bool(keys::CAPTURE_STARTUP_ERRORS, value)?;
        }
        if let Some(value) = self.get(keys::SHUTDOWN_TIMEOUT_SECONDS) {
            let secs = parse_u64(keys::SHUTDOWN_TIMEOUT_SECONDS, value)?;
            config.shutdown_timeout_ms =
                secs.checked_mul(1_000).ok_or_else(|| ConfigError::InvalidValue {
                    key: keys::SHUTDOWN_TIMEOUT_SECONDS,
                    value: value.to_string(),
                    reason: "timeout is too large".to_string(),
                })?;
        }
        if let Some(value) = self.get(keys::SHUTDOWN_TIMEOUT_MILLISECONDS) {
            config.shutdown_timeout_ms = parse_u64(keys::SHUTDOWN_TIMEOUT_MILLISECONDS, value)?;
        }
        Ok(())
    }
}

/// Split a semicolon-joined URL list, dropping empty entries.
pub fn split_urls(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_u64(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected true, false, 1 or 0".to_string(),
        }),
    }
}
