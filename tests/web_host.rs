//! End-to-end tests of a built web host serving HTTP.

use std::time::Duration;

use axum::{routing::get, BoxError, Router};
use tokio_util::sync::CancellationToken;
use webhost::config::{ConfigError, Settings};
use webhost::hosting::{Application, HostingEnvironment};
use webhost::server::ServerAddresses;
use webhost::{HostError, RunCoordinator, WebHost, WebHostBuilder};

mod common;

use common::SharedOutput;

fn builder() -> WebHostBuilder {
    WebHostBuilder::with_settings(Settings::new())
        .use_urls(["http://127.0.0.1:0"])
        .unwrap()
        .use_shutdown_timeout(Duration::from_secs(2))
}

fn hello_router(environment: &HostingEnvironment) -> Result<Router, BoxError> {
    let body = format!("hello from {}", environment.environment_name);
    Ok(Router::new().route(
        "/",
        get(move || {
            let body = body.clone();
            async move { body }
        }),
    ))
}

async fn wait_for_address(output: &SharedOutput) -> String {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if let Some(line) = output
                .lines()
                .into_iter()
                .find(|line| line.starts_with("Now listening on: "))
            {
                return line.trim_start_matches("Now listening on: ").to_string();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("host never reported an address")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_serves_startup_router_until_cancelled() {
    let host = builder()
        .use_environment("Development")
        .unwrap()
        .configure(hello_router)
        .build()
        .unwrap();
    let lifetime = host.lifetime().clone();
    let output = SharedOutput::default();
    let token = CancellationToken::new();

    let run = tokio::spawn(
        RunCoordinator::with_output(output.clone()).run_async_with_token(host, token.clone()),
    );

    let address = wait_for_address(&output).await;
    assert!(address.starts_with("http://127.0.0.1:"));
    assert!(lifetime.is_started());

    let body = reqwest::get(&address).await.unwrap().text().await.unwrap();
    assert_eq!(body, "hello from Development");

    token.cancel();
    run.await.unwrap().unwrap();

    assert_eq!(output.lines()[0], "Hosting environment: Development");
    assert!(lifetime.is_stopped());
    assert!(reqwest::get(&address).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_captured_startup_error_serves_error_page() {
    let host = builder()
        .use_environment("Development")
        .unwrap()
        .capture_startup_errors(true)
        .configure(|_: &HostingEnvironment| -> Result<Router, BoxError> {
            Err("database unreachable".into())
        })
        .build()
        .unwrap();
    let output = SharedOutput::default();
    let token = CancellationToken::new();

    let run = tokio::spawn(
        RunCoordinator::with_output(output.clone()).run_async_with_token(host, token.clone()),
    );

    let address = wait_for_address(&output).await;
    let response = reqwest::get(format!("{address}/anything")).await.unwrap();
    assert_eq!(response.status(), 500);
    assert!(response.text().await.unwrap().contains("database unreachable"));

    token.cancel();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_uncaptured_startup_error_fails_run() {
    let host = builder().build().unwrap();
    let lifetime = host.lifetime().clone();

    let result = RunCoordinator::with_output(SharedOutput::default())
        .run_async_with_token(host, CancellationToken::new())
        .await;

    assert!(matches!(result, Err(HostError::Startup(_))));
    assert!(!lifetime.is_started());
    assert!(lifetime.is_stopped());
}

#[tokio::test]
async fn test_start_twice_fails() {
    let mut host = builder().configure(hello_router).build().unwrap();

    host.start().await.unwrap();
    assert!(matches!(host.start().await, Err(HostError::AlreadyStarted)));

    let addresses = host.features().get::<ServerAddresses>().unwrap();
    assert_eq!(addresses.len(), 1);

    host.stop().await;
    host.dispose();
    host.dispose();
    assert!(host.lifetime().is_stopped());
}

#[tokio::test]
async fn test_bind_conflict_is_reported() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let mut host = WebHostBuilder::with_settings(Settings::new())
        .use_urls([format!("http://127.0.0.1:{port}")])
        .unwrap()
        .configure(hello_router)
        .build()
        .unwrap();

    match host.start().await {
        Err(HostError::Bind { url, .. }) => assert_eq!(url, format!("http://127.0.0.1:{port}")),
        other => panic!("expected bind error, got {other:?}"),
    }
    host.dispose();
}

#[test]
fn test_invalid_configuration_rejected_at_build() {
    let result = WebHostBuilder::with_settings(Settings::new())
        .use_urls(["https://localhost:5001", "http://localhost:5000/api"])
        .unwrap()
        .use_server("kestrel")
        .build();

    match result.err() {
        Some(HostError::Config(ConfigError::Validation(errors))) => assert_eq!(errors.len(), 3),
        Some(other) => panic!("unexpected error {other:?}"),
        None => panic!("expected build to fail"),
    }
}

#[test]
fn test_builder_reads_environment_settings() {
    let settings = Settings::from_vars(vec![
        ("WEBHOST_ENVIRONMENT".to_string(), "Staging".to_string()),
        ("WEBHOST_URLS".to_string(), "http://localhost:7000;http://localhost:7001".to_string()),
    ]);
    let host: WebHost = WebHostBuilder::with_settings(settings).build().unwrap();

    assert!(host.environment().is_staging());
    assert_eq!(
        host.config().urls,
        vec!["http://localhost:7000", "http://localhost:7001"]
    );
}
