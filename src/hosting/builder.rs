//! Fluent web host configuration.
//!
//! Every setter writes one key into the settings bag; `build` overlays the
//! bag onto the file configuration and validates the result.

use std::any::type_name;
use std::path::Path;
use std::time::Duration;

use axum::{BoxError, Router};

use crate::config::{keys, validate_config, ConfigError, HostConfig, Settings};
use crate::error::HostError;
use crate::hosting::environment::HostingEnvironment;
use crate::hosting::host::WebHost;
use crate::hosting::startup::Startup;

/// Builder for [`WebHost`].
pub struct WebHostBuilder {
    config: HostConfig,
    settings: Settings,
    startup: Option<Box<dyn Startup>>,
}

impl WebHostBuilder {
    /// A builder seeded from `WEBHOST_*` environment variables.
    pub fn new() -> Self {
        Self::with_settings(Settings::from_env())
    }

    /// A builder seeded from the given settings only.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            config: HostConfig::default(),
            settings,
            startup: None,
        }
    }

    /// Use `config` as the base layer (typically loaded from a file).
    pub fn use_config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Set an arbitrary setting.
    pub fn use_setting(mut self, key: &str, value: impl Into<String>) -> Result<Self, HostError> {
        self.settings.set(key, value)?;
        Ok(self)
    }

    pub fn capture_startup_errors(mut self, capture: bool) -> Self {
        self.settings
            .insert(keys::CAPTURE_STARTUP_ERRORS, capture.to_string());
        self
    }

    /// Select the server implementation by name.
    pub fn use_server(mut self, name: &str) -> Self {
        self.settings.insert(keys::SERVER, name.to_string());
        self
    }

    /// Set the application base path.
    pub fn use_content_root(mut self, path: impl AsRef<Path>) -> Self {
        self.settings.insert(
            keys::CONTENT_ROOT,
            path.as_ref().to_string_lossy().into_owned(),
        );
        self
    }

    pub fn use_web_root(mut self, path: impl AsRef<Path>) -> Self {
        self.settings
            .insert(keys::WEB_ROOT, path.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn use_environment(mut self, name: &str) -> Result<Self, HostError> {
        if name.trim().is_empty() {
            return Err(HostError::invalid_argument(
                "environment",
                "environment name must not be empty",
            ));
        }
        self.settings.insert(keys::ENVIRONMENT, name.trim().to_string());
        Ok(self)
    }

    /// Set the listen URLs, replacing any configured before.
    pub fn use_urls<I, S>(mut self, urls: I) -> Result<Self, HostError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls: Vec<String> = urls
            .into_iter()
            .map(|url| url.as_ref().trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        if urls.is_empty() {
            return Err(HostError::invalid_argument(
                "urls",
                "at least one listen url is required",
            ));
        }
        self.settings.insert(keys::URLS, urls.join(";"));
        Ok(self)
    }

    pub fn use_application_name(mut self, name: &str) -> Self {
        self.settings.insert(keys::APPLICATION_NAME, name.to_string());
        self
    }

    /// Bound the graceful drain on stop.
    ///
    /// Stored with millisecond precision; a sub-millisecond remainder rounds up.
    pub fn use_shutdown_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.settings
            .insert(keys::SHUTDOWN_TIMEOUT_MILLISECONDS, millis.to_string());
        self
    }

    /// Use a startup type; its name is recorded under `startupAssembly`.
    pub fn use_startup<S: Startup + Default>(mut self) -> Self {
        self.settings
            .insert(keys::STARTUP_ASSEMBLY, type_name::<S>().to_string());
        self.startup = Some(Box::new(S::default()));
        self
    }

    /// Use an inline startup.
    pub fn configure<F>(mut self, configure: F) -> Self
    where
        F: Fn(&HostingEnvironment) -> Result<Router, BoxError> + Send + Sync + 'static,
    {
        self.startup = Some(Box::new(configure));
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Overlay the settings, validate, and build the host.
    pub fn build(self) -> Result<WebHost, HostError> {
        let mut config = self.config;
        self.settings.apply_to(&mut config)?;
        validate_config(&config).map_err(ConfigError::Validation)?;

        tracing::debug!(
            environment = %config.environment,
            urls = ?config.urls,
            server = %config.server,
            "Web host configured"
        );
        Ok(WebHost::new(config, self.startup))
    }
}

impl Default for WebHostBuilder {
    fn default() -> Self {
        Self::new()
    }
}
