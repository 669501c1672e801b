//! `webhost`: run a web host until Ctrl+C.
//!
//! Serves a welcome page on the configured URLs. Configuration comes from an
//! optional TOML file, `WEBHOST_*` environment variables and the flags below,
//! later sources winning.

use std::path::PathBuf;

use axum::{routing::get, BoxError, Router};
use clap::Parser;

use webhost::config::{load_config, settings::split_urls, HostConfig};
use webhost::hosting::{HostingEnvironment, Startup, WebHostBuilder};
use webhost::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "webhost")]
#[command(about = "Run a web host until Ctrl+C", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Semicolon-separated listen URLs.
    #[arg(long)]
    urls: Option<String>,

    /// Environment name (Development, Staging, Production).
    #[arg(short, long)]
    environment: Option<String>,

    /// Application base path.
    #[arg(long)]
    content_root: Option<PathBuf>,

    /// Serve an error page when startup fails instead of exiting.
    #[arg(long)]
    capture_startup_errors: bool,
}

#[derive(Default)]
struct WelcomeStartup;

impl Startup for WelcomeStartup {
    fn configure(&self, environment: &HostingEnvironment) -> Result<Router, BoxError> {
        let greeting = format!(
            "Hello from {} ({})\n",
            environment.application_name, environment.environment_name
        );
        Ok(Router::new().route(
            "/",
            get(move || {
                let greeting = greeting.clone();
                async move { greeting }
            }),
        ))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };
    init_logging(&config.observability)?;

    let mut builder = WebHostBuilder::new()
        .use_config(config)
        .use_startup::<WelcomeStartup>();
    if let Some(urls) = &cli.urls {
        builder = builder.use_urls(split_urls(urls))?;
    }
    if let Some(environment) = &cli.environment {
        builder = builder.use_environment(environment)?;
    }
    if let Some(content_root) = &cli.content_root {
        builder = builder.use_content_root(content_root);
    }
    if cli.capture_startup_errors {
        builder = builder.capture_startup_errors(true);
    }

    let host = builder.build()?;
    webhost::run(host)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
