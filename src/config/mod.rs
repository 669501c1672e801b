//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → HostConfig (file layer)
//!
//! WEBHOST_* environment variables, builder calls
//!     → settings.rs (string key/value bag)
//!     → overlaid onto HostConfig
//!     → validation.rs (semantic checks)
//!     → HostConfig handed to the built host
//! ```
//!
//! # Design Decisions
//! - Later layers win: file, then environment, then code
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{HostConfig, LogFormat, ObservabilityConfig};
pub use settings::{keys, Settings};
pub use validation::{validate_config, ValidationError};
