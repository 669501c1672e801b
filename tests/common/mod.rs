//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::Extensions;
use webhost::hosting::{Application, HostingEnvironment};
use webhost::server::ServerAddresses;
use webhost::{ApplicationLifetime, HostError};

/// A cloneable in-memory writer for status lines.
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn lines(&self) -> Vec<String> {
        let buffer = self.0.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Poll until a line satisfying `predicate` shows up.
    pub fn wait_for_line(&self, predicate: impl Fn(&str) -> bool) -> String {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(line) = self.lines().into_iter().find(|l| predicate(l)) {
                return line;
            }
            assert!(Instant::now() < deadline, "expected line never written");
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Call counts recorded by a `FakeApp`.
#[derive(Debug, Default)]
pub struct Counters {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub disposals: AtomicUsize,
}

impl Counters {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }
}

/// An application that binds nothing and records what the coordinator does.
pub struct FakeApp {
    services: Extensions,
    features: Extensions,
    addresses: Vec<String>,
    start_error: Option<String>,
    lifetime: ApplicationLifetime,
    counters: Arc<Counters>,
}

impl FakeApp {
    pub fn new(environment: &str, addresses: &[&str]) -> (Self, Arc<Counters>) {
        let lifetime = ApplicationLifetime::new();
        let mut services = Extensions::new();
        services.insert(lifetime.clone());
        services.insert(HostingEnvironment::new(environment));

        let counters = Arc::new(Counters::default());
        let app = Self {
            services,
            features: Extensions::new(),
            addresses: addresses.iter().map(|a| a.to_string()).collect(),
            start_error: None,
            lifetime,
            counters: counters.clone(),
        };
        (app, counters)
    }

    /// Make `start()` fail with a startup error.
    pub fn failing_with(mut self, message: &str) -> Self {
        self.start_error = Some(message.to_string());
        self
    }

    /// Drop the lifetime service from the registry.
    pub fn without_lifetime(mut self) -> Self {
        self.services.remove::<ApplicationLifetime>();
        self
    }

    pub fn lifetime(&self) -> ApplicationLifetime {
        self.lifetime.clone()
    }
}

impl Application for FakeApp {
    async fn start(&mut self) -> Result<(), HostError> {
        self.counters.starts.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.start_error {
            return Err(HostError::Startup(message.clone().into()));
        }
        if !self.addresses.is_empty() {
            self.features
                .insert(ServerAddresses::new(self.addresses.clone()));
        }
        Ok(())
    }

    async fn stop(&mut self) {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn dispose(&mut self) {
        self.counters.disposals.fetch_add(1, Ordering::SeqCst);
    }

    fn services(&self) -> &Extensions {
        &self.services
    }

    fn features(&self) -> &Extensions {
        &self.features
    }
}
