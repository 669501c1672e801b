//! Web host configuration and run coordination.
//!
//! Configure an application with [`hosting::WebHostBuilder`], then hand it to
//! [`hosting::run`] (blocks until Ctrl+C) or [`hosting::run_with_token`]
//! (blocks until the token is cancelled).

pub mod config;
pub mod error;
pub mod hosting;
pub mod lifecycle;
pub mod observability;
pub mod server;

pub use config::HostConfig;
pub use error::HostError;
pub use hosting::{run, run_with_token, Application, WebHost, WebHostBuilder};
pub use lifecycle::{ApplicationLifetime, RunCoordinator};
