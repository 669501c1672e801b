//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Lifetime (lifetime.rs):
//!     started → stopping → stopped, each one-shot
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → lifetime.request_stop()
//!
//! Run coordination (runner.rs):
//!     start → report → wait for stopping → stop → dispose
//! ```
//!
//! # Design Decisions
//! - Every shutdown trigger ends in the same `request_stop()`
//! - Disposal is tied to a scope guard, never to a code path
//! - The coordinator waits indefinitely; the host bounds its own drain

pub mod lifetime;
pub mod runner;
pub mod signals;

pub use lifetime::ApplicationLifetime;
pub use runner::{RunCoordinator, SHUTDOWN_BANNER};
pub use signals::{bind_interrupt, InterruptBinding};
