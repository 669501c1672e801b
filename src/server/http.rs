//! HTTP listener set backed by axum.
//!
//! # Responsibilities
//! - Bind one listener per configured URL
//! - Serve the startup's router with request tracing
//! - Drain connections on graceful shutdown, abort on disposal

use std::io;
use std::time::Duration;

use axum::Router;
use futures_util::future::join_all;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::error::HostError;
use crate::server::{ListenUrl, ServerAddresses};

/// HTTP server for a web host.
pub struct HttpServer {
    shutdown: CancellationToken,
    listeners: Vec<JoinHandle<io::Result<()>>>,
}

impl HttpServer {
    pub fn new() -> Self {
        Self {
            shutdown: CancellationToken::new(),
            listeners: Vec::new(),
        }
    }

    /// Bind every URL and start serving `app` on each.
    ///
    /// Listeners bound before a failing URL keep running until
    /// [`shutdown`](Self::shutdown) or [`abort`](Self::abort) is called.
    pub async fn start(&mut self, app: Router, urls: &[ListenUrl]) -> Result<ServerAddresses, HostError> {
        let app = app.layer(TraceLayer::new_for_http());
        let mut addresses = Vec::with_capacity(urls.len());

        for url in urls {
            let bind_error = |source| HostError::Bind {
                url: url.to_string(),
                source,
            };
            let listener = TcpListener::bind((url.bind_host(), url.port()))
                .await
                .map_err(bind_error)?;
            let local_addr = listener.local_addr().map_err(bind_error)?;

            tracing::info!(
                url = %url,
                address = %local_addr,
                "Listener bound"
            );

            let shutdown = self.shutdown.clone();
            let app = app.clone();
            self.listeners.push(tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown.cancelled_owned())
                    .await
            }));
            addresses.push(url.address_for(local_addr.port()));
        }

        Ok(ServerAddresses::new(addresses))
    }

    /// Stop accepting, then wait up to `timeout` for open connections to drain.
    pub async fn shutdown(&mut self, timeout: Duration) {
        self.shutdown.cancel();

        let drain = join_all(self.listeners.iter_mut());
        match tokio::time::timeout(timeout, drain).await {
            Ok(results) => {
                for result in results {
                    match result {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => tracing::warn!(error = %e, "Listener exited with error"),
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => tracing::error!(error = %e, "Listener task panicked"),
                    }
                }
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    "Connections did not drain in time, aborting listeners"
                );
                for listener in &self.listeners {
                    listener.abort();
                }
            }
        }
        self.listeners.clear();
    }

    /// Stop every listener immediately.
    pub fn abort(&mut self) {
        self.shutdown.cancel();
        for listener in self.listeners.drain(..) {
            listener.abort();
        }
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}
