//! Server subsystem.
//!
//! # Data Flow
//! ```text
//! HostConfig.urls
//!     → ListenUrl::parse (scheme, host, port)
//!     → http.rs (bind one listener per URL, serve the startup's router)
//!     → ServerAddresses (bound endpoints, published as a host feature)
//! ```
//!
//! # Design Decisions
//! - Only plain `http` is served; TLS termination belongs in front of the host
//! - `*` and `+` hosts bind every interface
//! - Reported addresses keep the configured host and carry the bound port,
//!   so `http://localhost:0` is reported with the port the OS picked

use std::fmt;
use std::str::FromStr;

use url::{Host, Url};

pub mod http;

pub use http::HttpServer;

/// Server implementations a host can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    Axum,
}

/// Error returned when a server name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown server implementation `{0}`")]
pub struct UnknownServerError(pub String);

impl FromStr for ServerKind {
    type Err = UnknownServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("axum") {
            Ok(ServerKind::Axum)
        } else {
            Err(UnknownServerError(s.to_string()))
        }
    }
}

/// Error type for listen URL parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListenUrlError {
    #[error(transparent)]
    Parse(#[from] url::ParseError),
    #[error("unsupported scheme `{0}`, only http is served")]
    UnsupportedScheme(String),
    #[error("url has no host")]
    MissingHost,
    #[error("path `{0}` is not supported in a listen url")]
    PathNotSupported(String),
}

/// A parsed listen URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenUrl {
    /// Host as written in the configuration (`localhost`, `*`, `[::1]`).
    display_host: String,
    /// Host handed to the socket layer.
    bind_host: String,
    port: u16,
}

impl ListenUrl {
    pub fn parse(raw: &str) -> Result<Self, ListenUrlError> {
        let raw = raw.trim();
        let (normalized, wildcard) = replace_wildcard_host(raw);
        let url = Url::parse(&normalized)?;

        if url.scheme() != "http" {
            return Err(ListenUrlError::UnsupportedScheme(url.scheme().to_string()));
        }
        if !matches!(url.path(), "" | "/") {
            return Err(ListenUrlError::PathNotSupported(url.path().to_string()));
        }

        let bind_host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(ListenUrlError::MissingHost),
        };
        let display_host = match wildcard {
            Some(w) => w.to_string(),
            None => url.host_str().unwrap_or(&bind_host).to_string(),
        };

        Ok(Self {
            display_host,
            bind_host,
            port: url.port_or_known_default().unwrap_or(80),
        })
    }

    pub fn bind_host(&self) -> &str {
        &self.bind_host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The address reported once bound to `port`.
    pub fn address_for(&self, port: u16) -> String {
        format!("http://{}:{}", self.display_host, port)
    }
}

impl fmt::Display for ListenUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address_for(self.port))
    }
}

fn replace_wildcard_host(raw: &str) -> (String, Option<char>) {
    if let Some((scheme, rest)) = raw.split_once("://") {
        for wildcard in ['*', '+'] {
            if let Some(after) = rest.strip_prefix(wildcard) {
                if after.is_empty() || after.starts_with(':') || after.starts_with('/') {
                    return (format!("{scheme}://0.0.0.0{after}"), Some(wildcard));
                }
            }
        }
    }
    (raw.to_string(), None)
}

/// Endpoints a started server is listening on, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerAddresses(Vec<String>);

impl ServerAddresses {
    pub fn new(addresses: Vec<String>) -> Self {
        Self(addresses)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
