//! The application handle driven by the run coordinator.
//!
//! # Responsibilities
//! - Define what "start", "stop" and "dispose" mean for a runnable unit
//! - Expose type-keyed service and feature registries
//! - Guarantee disposal through a scope guard
//!
//! # Design Decisions
//! - Registries are `http::Extensions` maps keyed by type
//! - `stop` is graceful and async; `dispose` is immediate and sync so it can
//!   run from `Drop`

use std::future::Future;
use std::ops::{Deref, DerefMut};

use axum::http::Extensions;

use crate::error::HostError;

/// A buildable, startable, stoppable unit of work.
///
/// The run coordinator expects an `ApplicationLifetime` and a
/// `HostingEnvironment` in [`services`](Application::services), and reads an
/// optional `ServerAddresses` from [`features`](Application::features) after
/// a successful start.
pub trait Application {
    /// Start the application. Called at most once by the run coordinator.
    fn start(&mut self) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Gracefully stop the application after a stop was requested.
    fn stop(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }

    /// Release everything the application holds.
    fn dispose(&mut self);

    /// Runtime services, keyed by type.
    fn services(&self) -> &Extensions;

    /// Facts discovered at runtime, keyed by type.
    fn features(&self) -> &Extensions;
}

/// Owns an application and disposes it exactly once when dropped.
///
/// Drop runs on every exit path of the owning scope: normal return, `?`
/// early return, panic unwinding, and cancellation of the enclosing future.
pub struct ApplicationScope<A: Application> {
    application: A,
}

impl<A: Application> ApplicationScope<A> {
    pub fn new(application: A) -> Self {
        Self { application }
    }
}

impl<A: Application> Deref for ApplicationScope<A> {
    type Target = A;

    fn deref(&self) -> &A {
        &self.application
    }
}

impl<A: Application> DerefMut for ApplicationScope<A> {
    fn deref_mut(&mut self) -> &mut A {
        &mut self.application
    }
}

impl<A: Application> Drop for ApplicationScope<A> {
    fn drop(&mut self) {
        self.application.dispose();
    }
}
