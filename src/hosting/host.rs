//! The web host: the application handle produced by `WebHostBuilder`.
//!
//! # Responsibilities
//! - Resolve the startup into a router (or an error page)
//! - Start the configured server on every listen URL
//! - Publish the bound addresses and drive the lifetime notifications
//!
//! # Design Decisions
//! - Startup failures are fatal unless `capture_startup_errors` is set
//! - Graceful stop is bounded by the configured shutdown timeout
//! - Disposal is idempotent and never waits

use axum::http::Extensions;
use axum::{BoxError, Router};

use crate::config::{ConfigError, HostConfig, ValidationError};
use crate::error::HostError;
use crate::hosting::application::Application;
use crate::hosting::builder::WebHostBuilder;
use crate::hosting::environment::HostingEnvironment;
use crate::hosting::startup::{startup_error_router, Startup};
use crate::lifecycle::ApplicationLifetime;
use crate::observability::metrics;
use crate::server::{HttpServer, ListenUrl, ServerKind};

/// A configured, not yet started web application.
pub struct WebHost {
    config: HostConfig,
    environment: HostingEnvironment,
    startup: Option<Box<dyn Startup>>,
    server: HttpServer,
    lifetime: ApplicationLifetime,
    services: Extensions,
    features: Extensions,
    started: bool,
    disposed: bool,
}

impl WebHost {
    pub fn builder() -> WebHostBuilder {
        WebHostBuilder::new()
    }

    pub(crate) fn new(config: HostConfig, startup: Option<Box<dyn Startup>>) -> Self {
        let environment = HostingEnvironment::from_config(&config);
        let lifetime = ApplicationLifetime::new();

        let mut services = Extensions::new();
        services.insert(lifetime.clone());
        services.insert(environment.clone());
        services.insert(config.clone());

        Self {
            config,
            environment,
            startup,
            server: HttpServer::new(),
            lifetime,
            services,
            features: Extensions::new(),
            started: false,
            disposed: false,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn environment(&self) -> &HostingEnvironment {
        &self.environment
    }

    pub fn lifetime(&self) -> &ApplicationLifetime {
        &self.lifetime
    }

    fn build_router(&self) -> Result<Router, HostError> {
        let result = match &self.startup {
            Some(startup) => startup.configure(&self.environment),
            None => Err(BoxError::from(
                "no startup configured; call `use_startup` or `configure` on the builder",
            )),
        };

        match result {
            Ok(router) => Ok(router),
            Err(error) if self.config.capture_startup_errors => {
                tracing::error!(error = %error, "Application startup failed, serving error page");
                metrics::record_lifecycle("startup_failed");
                Ok(startup_error_router(&self.environment, &error))
            }
            Err(error) => {
                tracing::error!(error = %error, "Application startup failed");
                metrics::record_lifecycle("startup_failed");
                Err(HostError::Startup(error))
            }
        }
    }

    fn listen_urls(&self) -> Result<Vec<ListenUrl>, HostError> {
        self.config
            .urls
            .iter()
            .map(|url| {
                ListenUrl::parse(url).map_err(|e| {
                    HostError::Config(ConfigError::Validation(vec![ValidationError::InvalidUrl {
                        url: url.clone(),
                        reason: e.to_string(),
                    }]))
                })
            })
            .collect()
    }
}

impl Application for WebHost {
    async fn start(&mut self) -> Result<(), HostError> {
        if self.started {
            return Err(HostError::AlreadyStarted);
        }
        self.started = true;

        let observability = &self.config.observability;
        if observability.metrics_enabled {
            if let Ok(addr) = observability.metrics_address.parse() {
                metrics::init_metrics(addr);
            }
        }

        let server_kind = self
            .config
            .server
            .parse::<ServerKind>()
            .map_err(|e| {
                HostError::Config(ConfigError::Validation(vec![ValidationError::UnknownServer(e.0)]))
            })?;
        let router = self.build_router()?;
        let urls = self.listen_urls()?;

        let addresses = match server_kind {
            ServerKind::Axum => self.server.start(router, &urls).await?,
        };

        tracing::info!(
            environment = %self.environment.environment_name,
            application = %self.environment.application_name,
            listeners = addresses.len(),
            "Application started"
        );
        self.features.insert(addresses);
        self.lifetime.notify_started();
        metrics::record_lifecycle("started");
        Ok(())
    }

    async fn stop(&mut self) {
        self.lifetime.request_stop();
        metrics::record_lifecycle("stop_requested");

        self.server.shutdown(self.config.shutdown_timeout()).await;

        self.lifetime.notify_stopped();
        metrics::record_lifecycle("stopped");
        tracing::info!("Application stopped");
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.server.abort();
        self.lifetime.request_stop();
        self.lifetime.notify_stopped();
        metrics::record_lifecycle("disposed");
        tracing::debug!("Application disposed");
    }

    fn services(&self) -> &Extensions {
        &self.services
    }

    fn features(&self) -> &Extensions {
        &self.features
    }
}
