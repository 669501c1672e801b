//! Run coordination: start an application, block until stop, tear down.
//!
//! # Data Flow
//! ```text
//! run(app) / run_with_token(app, token)
//!     → ApplicationScope (disposal guaranteed from here on)
//!     → app.start()
//!     → resolve ApplicationLifetime; bind interrupt (no-token runs only)
//!     → report environment, addresses, shutdown message
//!     → link external token → lifetime.request_stop()
//!     → await lifetime.stopping()
//!     → app.stop(), then scope drop → app.dispose()
//! ```
//!
//! # Design Decisions
//! - Interrupts and the external token fan in to the one idempotent
//!   `request_stop()`; the lifetime is the single source of truth
//! - The only wait is on the stopping signal; there is no timeout here,
//!   callers needing one cancel their token on a timer
//! - The scope guard is taken before any runtime exists, so a blocking run
//!   that cannot get a runtime still disposes the application
//! - Blocking entry points refuse to run inside an existing Tokio runtime

use std::fmt::Display;
use std::future::Future;
use std::io::{self, Stdout, Write};

use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use crate::error::HostError;
use crate::hosting::{Application, ApplicationScope, HostingEnvironment};
use crate::lifecycle::signals::bind_interrupt;
use crate::lifecycle::ApplicationLifetime;
use crate::server::ServerAddresses;

/// Shutdown message printed by runs that own the interrupt handler.
pub const SHUTDOWN_BANNER: &str = "Application started. Press Ctrl+C to shut down.";

/// Drives an application from "configured" to "stopped".
///
/// Status lines go to stdout unless another writer is supplied with
/// [`with_output`](RunCoordinator::with_output).
pub struct RunCoordinator<W = Stdout> {
    output: W,
}

impl RunCoordinator<Stdout> {
    pub fn new() -> Self {
        Self {
            output: io::stdout(),
        }
    }
}

impl Default for RunCoordinator<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> RunCoordinator<W> {
    pub fn with_output(output: W) -> Self {
        Self { output }
    }

    /// Run until Ctrl+C (or SIGTERM), blocking the calling thread.
    ///
    /// Fails with [`HostError::NestedRuntime`] when called from within a
    /// Tokio runtime; the application is disposed either way.
    ///
    /// The signal handlers stay registered with Tokio after the run ends, so
    /// for the rest of the process Ctrl+C no longer terminates it unless
    /// another handler acts on it.
    pub fn run<A: Application>(self, application: A) -> Result<(), HostError> {
        let application = ApplicationScope::new(application);
        block_on(self.run_until_stopped(application, None, SHUTDOWN_BANNER))?
    }

    /// Run until `token` is cancelled, blocking the calling thread.
    ///
    /// No interrupt handler is installed and no shutdown message is printed.
    /// Fails with [`HostError::NestedRuntime`] when called from within a
    /// Tokio runtime; the application is disposed either way.
    pub fn run_with_token<A: Application>(
        self,
        application: A,
        token: CancellationToken,
    ) -> Result<(), HostError> {
        let application = ApplicationScope::new(application);
        block_on(self.run_until_stopped(application, Some(token), ""))?
    }

    /// Async form of [`run`](Self::run).
    pub async fn run_async<A: Application>(self, application: A) -> Result<(), HostError> {
        self.run_until_stopped(ApplicationScope::new(application), None, SHUTDOWN_BANNER)
            .await
    }

    /// Async form of [`run_with_token`](Self::run_with_token).
    pub async fn run_async_with_token<A: Application>(
        self,
        application: A,
        token: CancellationToken,
    ) -> Result<(), HostError> {
        self.run_until_stopped(ApplicationScope::new(application), Some(token), "")
            .await
    }

    async fn run_until_stopped<A: Application>(
        mut self,
        mut application: ApplicationScope<A>,
        token: Option<CancellationToken>,
        shutdown_message: &str,
    ) -> Result<(), HostError> {
        application.start().await?;

        let lifetime = application
            .services()
            .get::<ApplicationLifetime>()
            .cloned()
            .ok_or(HostError::MissingService("ApplicationLifetime"))?;

        let _interrupt = if token.is_none() {
            Some(bind_interrupt(lifetime.clone())?)
        } else {
            None
        };

        let environment = application
            .services()
            .get::<HostingEnvironment>()
            .ok_or(HostError::MissingService("HostingEnvironment"))?;
        self.report(format_args!(
            "Hosting environment: {}",
            environment.environment_name
        ))?;

        if let Some(addresses) = application.features().get::<ServerAddresses>() {
            for address in addresses.iter() {
                self.report(format_args!("Now listening on: {address}"))?;
            }
        }

        if !shutdown_message.is_empty() {
            self.report(shutdown_message)?;
        }

        let _token_link = token.map(|token| link_token(token, lifetime.clone()));

        lifetime.stopping().await;
        tracing::info!("Application is shutting down...");
        application.stop().await;

        Ok(())
    }

    fn report(&mut self, line: impl Display) -> Result<(), HostError> {
        tracing::info!("{line}");
        writeln!(self.output, "{line}")
            .and_then(|()| self.output.flush())
            .map_err(HostError::Output)
    }
}

/// Request a stop on `lifetime` once `token` is cancelled.
///
/// The returned task ends by itself when the lifetime stops for any other
/// reason, and is aborted when the handle is dropped.
fn link_token(token: CancellationToken, lifetime: ApplicationLifetime) -> AbortOnDropHandle<()> {
    if token.is_cancelled() {
        lifetime.request_stop();
    }

    AbortOnDropHandle::new(tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("External cancellation requested stop");
                lifetime.request_stop();
            }
            _ = lifetime.stopping() => {}
        }
    }))
}

/// Drive `future` on a fresh runtime; `future` is dropped unpolled on error.
fn block_on<F: Future>(future: F) -> Result<F::Output, HostError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(HostError::NestedRuntime);
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("webhost-worker")
        .build()
        .map_err(HostError::Runtime)?;
    Ok(runtime.block_on(future))
}
