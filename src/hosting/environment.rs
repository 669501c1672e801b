//! Hosting environment information.

use std::path::PathBuf;

use crate::config::HostConfig;

/// Facts about the environment an application is hosted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingEnvironment {
    pub environment_name: String,
    pub application_name: String,
    pub content_root: PathBuf,
    pub web_root: PathBuf,
}

impl HostingEnvironment {
    pub const DEVELOPMENT: &'static str = "Development";
    pub const STAGING: &'static str = "Staging";
    pub const PRODUCTION: &'static str = "Production";

    /// Environment with the given name and otherwise default settings.
    pub fn new(environment_name: impl Into<String>) -> Self {
        let config = HostConfig {
            environment: environment_name.into(),
            ..HostConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &HostConfig) -> Self {
        let application_name = config
            .application_name
            .clone()
            .or_else(|| config.startup_assembly.as_deref().map(short_type_name))
            .unwrap_or_else(default_application_name);

        Self {
            environment_name: config.environment.clone(),
            application_name,
            content_root: config.content_root(),
            web_root: config.web_root(),
        }
    }

    /// Case-insensitive comparison with the environment name.
    pub fn is_environment(&self, name: &str) -> bool {
        self.environment_name.eq_ignore_ascii_case(name)
    }

    pub fn is_development(&self) -> bool {
        self.is_environment(Self::DEVELOPMENT)
    }

    pub fn is_staging(&self) -> bool {
        self.is_environment(Self::STAGING)
    }

    pub fn is_production(&self) -> bool {
        self.is_environment(Self::PRODUCTION)
    }
}

/// `my_app::startup::Startup` → `my_app`
fn short_type_name(type_name: &str) -> String {
    type_name
        .split("::")
        .next()
        .unwrap_or(type_name)
        .to_string()
}

fn default_application_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_checks_ignore_case() {
        let env = HostingEnvironment::new("development");
        assert!(env.is_development());
        assert!(env.is_environment("DEVELOPMENT"));
        assert!(!env.is_production());
        assert!(!env.is_staging());
    }

    #[test]
    fn test_from_config() {
        let config = HostConfig {
            environment: "Staging".into(),
            content_root: Some(PathBuf::from("/srv/app")),
            web_root: Some(PathBuf::from("public")),
            startup_assembly: Some("orders::startup::Startup".into()),
            ..HostConfig::default()
        };
        let env = HostingEnvironment::from_config(&config);
        assert!(env.is_staging());
        assert_eq!(env.application_name, "orders");
        assert_eq!(env.content_root, PathBuf::from("/srv/app"));
        assert_eq!(env.web_root, PathBuf::from("/srv/app/public"));
    }

    #[test]
    fn test_explicit_application_name_wins() {
        let config = HostConfig {
            application_name: Some("billing".into()),
            startup_assembly: Some("orders::Startup".into()),
            ..HostConfig::default()
        };
        assert_eq!(HostingEnvironment::from_config(&config).application_name, "billing");
    }
}
