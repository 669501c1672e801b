//! Hosting subsystem.
//!
//! # Data Flow
//! ```text
//! WebHostBuilder (builder.rs)
//!     → settings bag + file config
//!     → WebHost (host.rs), an Application (application.rs)
//!     → run / run_with_token (lifecycle::runner)
//!
//! WebHost::start:
//!     Startup (startup.rs) + HostingEnvironment (environment.rs)
//!     → Router → server → ServerAddresses feature
//! ```

pub mod application;
pub mod builder;
pub mod environment;
pub mod host;
pub mod startup;

use tokio_util::sync::CancellationToken;

pub use application::{Application, ApplicationScope};
pub use builder::WebHostBuilder;
pub use environment::HostingEnvironment;
pub use host::WebHost;
pub use startup::Startup;

use crate::error::HostError;
use crate::lifecycle::RunCoordinator;

/// Run `application` until Ctrl+C, printing status lines to stdout.
///
/// Blocks the calling thread. See [`RunCoordinator::run`] for the nested
/// runtime error and for Ctrl+C handling after the run returns.
pub fn run<A: Application>(application: A) -> Result<(), HostError> {
    RunCoordinator::new().run(application)
}

/// Run `application` until `token` is cancelled, printing status lines to stdout.
///
/// Blocks the calling thread; fails with [`HostError::NestedRuntime`] inside
/// an async runtime.
pub fn run_with_token<A: Application>(application: A, token: CancellationToken) -> Result<(), HostError> {
    RunCoordinator::new().run_with_token(application, token)
}

