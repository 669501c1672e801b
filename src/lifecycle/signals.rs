//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGINT and SIGTERM on Unix, Ctrl+C on Windows)
//! - Translate signal deliveries into a stop request on the lifetime
//!
//! # Design Decisions
//! - Uses Tokio's signal handling; once registered, the default action
//!   (terminating the process) no longer runs for that signal
//! - Handlers are installed synchronously, before any status line is printed
//! - The interrupt hook is process-wide: only one binding may exist at a time

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::task::AbortOnDropHandle;

use crate::error::HostError;
use crate::lifecycle::ApplicationLifetime;

static INTERRUPT_BOUND: AtomicBool = AtomicBool::new(false);

/// Keeps an interrupt binding alive.
///
/// Dropping it stops forwarding signals and releases the process-wide slot.
/// Tokio keeps the OS handlers registered afterwards: later interrupts are
/// swallowed instead of terminating the process until a new binding forwards
/// them again.
#[must_use = "the interrupt binding is released when dropped"]
pub struct InterruptBinding {
    _listener: AbortOnDropHandle<()>,
}

impl Drop for InterruptBinding {
    fn drop(&mut self) {
        INTERRUPT_BOUND.store(false, Ordering::Release);
    }
}

/// Forward interrupt signals to `lifetime.request_stop()`.
///
/// Must be called from within a Tokio runtime. Fails with
/// [`HostError::InterruptHandlerActive`] while another binding is alive.
pub fn bind_interrupt(lifetime: ApplicationLifetime) -> Result<InterruptBinding, HostError> {
    if INTERRUPT_BOUND
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(HostError::InterruptHandlerActive);
    }

    let mut signals = match ShutdownSignals::install() {
        Ok(signals) => signals,
        Err(e) => {
            INTERRUPT_BOUND.store(false, Ordering::Release);
            return Err(HostError::Signal(e));
        }
    };

    let listener = tokio::spawn(async move {
        while let Some(signal) = signals.recv().await {
            if lifetime.is_stop_requested() {
                tracing::warn!(signal, "Shutdown already in progress");
            } else {
                tracing::info!(signal, "Shutdown signal received");
            }
            lifetime.request_stop();
        }
    });

    Ok(InterruptBinding {
        _listener: AbortOnDropHandle::new(listener),
    })
}

#[cfg(unix)]
struct ShutdownSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            Some(()) = self.interrupt.recv() => Some("SIGINT"),
            Some(()) = self.terminate.recv() => Some("SIGTERM"),
            else => None,
        }
    }
}

#[cfg(windows)]
struct ShutdownSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl ShutdownSignals {
    fn install() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    async fn recv(&mut self) -> Option<&'static str> {
        self.ctrl_c.recv().await.map(|()| "CTRL_C")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_binding_per_process() {
        let first = bind_interrupt(ApplicationLifetime::new()).unwrap();
        assert!(matches!(
            bind_interrupt(ApplicationLifetime::new()),
            Err(HostError::InterruptHandlerActive)
        ));

        drop(first);
        let again = bind_interrupt(ApplicationLifetime::new());
        assert!(again.is_ok());
    }
}
