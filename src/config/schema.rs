//! Configuration schema definitions.
//!
//! This module defines the typed view of the host settings.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a web host.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Application name reported by the hosting environment.
    pub application_name: Option<String>,

    /// Environment name (e.g., "Development", "Production").
    pub environment: String,

    /// Listen URLs (e.g., "http://localhost:5000").
    pub urls: Vec<String>,

    /// Application base path. Defaults to the working directory.
    pub content_root: Option<PathBuf>,

    /// Static web root. Defaults to `<content_root>/wwwroot`.
    pub web_root: Option<PathBuf>,

    /// Server implementation selector.
    pub server: String,

    /// Name of the startup the host was configured with.
    pub startup_assembly: Option<String>,

    /// Serve an error page instead of failing when startup fails.
    pub capture_startup_errors: bool,

    /// Grace period for draining the server on shutdown, in milliseconds.
    pub shutdown_timeout_ms: u64,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            application_name: None,
            environment: "Production".to_string(),
            urls: vec!["http://localhost:5000".to_string()],
            content_root: None,
            web_root: None,
            server: "axum".to_string(),
            startup_assembly: None,
            capture_startup_errors: false,
            shutdown_timeout_ms: 5_000,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl HostConfig {
    /// Shutdown grace period as a `Duration`.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Resolved content root.
    pub fn content_root(&self) -> PathBuf {
        match &self.content_root {
            Some(path) => path.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Resolved web root; relative paths are taken from the content root.
    pub fn web_root(&self) -> PathBuf {
        let content_root = self.content_root();
        match &self.web_root {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => content_root.join(path),
            None => content_root.join("wwwroot"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
