//! Crate-wide error type.
//!
//! # Design Decisions
//! - One enum for everything a caller of `run` can observe
//! - Configuration problems keep their own type (`ConfigError`) and are wrapped
//! - Nothing is retried; every variant ends the run it occurred in

use std::io;

use axum::BoxError;

use crate::config::ConfigError;

/// Errors surfaced by the builder, the host and the run coordinator.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A caller passed a value the configuration sink cannot accept.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Configuration could not be loaded or did not validate.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `start()` was called on an application that is already running.
    #[error("application has already been started")]
    AlreadyStarted,

    /// The startup failed to produce a request pipeline.
    #[error("application startup failed: {0}")]
    Startup(#[source] BoxError),

    /// A listen URL could not be bound.
    #[error("failed to bind {url}: {source}")]
    Bind {
        url: String,
        #[source]
        source: io::Error,
    },

    /// A service the coordinator depends on is missing from the registry.
    #[error("required service `{0}` is not registered")]
    MissingService(&'static str),

    /// The OS signal handler could not be installed.
    #[error("failed to install signal handler: {0}")]
    Signal(#[source] io::Error),

    /// Another run already owns the process interrupt handler.
    #[error("an interrupt handler is already bound by another run")]
    InterruptHandlerActive,

    /// Writing a status line failed.
    #[error("failed to write status output: {0}")]
    Output(#[source] io::Error),

    /// A blocking run was started from inside an async runtime.
    #[error("blocking run called from within an async runtime; use the async form")]
    NestedRuntime,

    /// The async runtime backing a blocking run could not be created.
    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl HostError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        HostError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}
