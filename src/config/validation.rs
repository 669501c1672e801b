//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every listen URL is usable by the server
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HostConfig → Result<(), Vec<ValidationError>>
//! - Runs before a host is built from the config

use std::net::SocketAddr;

use crate::config::schema::HostConfig;
use crate::server::{ListenUrl, ServerKind};

/// A single semantic problem in a `HostConfig`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no listen urls configured")]
    NoUrls,

    #[error("invalid listen url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("environment name must not be empty")]
    EmptyEnvironment,

    #[error("unknown server implementation `{0}`")]
    UnknownServer(String),

    #[error("shutdown timeout must be greater than zero")]
    ZeroShutdownTimeout,

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.urls.is_empty() {
        errors.push(ValidationError::NoUrls);
    }
    for url in &config.urls {
        if let Err(e) = ListenUrl::parse(url) {
            errors.push(ValidationError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.environment.trim().is_empty() {
        errors.push(ValidationError::EmptyEnvironment);
    }

    if config.server.parse::<ServerKind>().is_err() {
        errors.push(ValidationError::UnknownServer(config.server.clone()));
    }

    if config.shutdown_timeout_ms == 0 {
        errors.push(ValidationError::ZeroShutdownTimeout);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
