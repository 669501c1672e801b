//! Application startup: turning an environment into a router.

use axum::http::StatusCode;
use axum::{BoxError, Router};

use crate::hosting::HostingEnvironment;

/// Builds the request pipeline a host serves.
///
/// Implemented for closures, so `builder.configure(|env| Ok(router))` works
/// without a dedicated type.
pub trait Startup: Send + Sync + 'static {
    fn configure(&self, environment: &HostingEnvironment) -> Result<Router, BoxError>;
}

impl<F> Startup for F
where
    F: Fn(&HostingEnvironment) -> Result<Router, BoxError> + Send + Sync + 'static,
{
    fn configure(&self, environment: &HostingEnvironment) -> Result<Router, BoxError> {
        self(environment)
    }
}

/// Router answering every request with a 500 describing a startup failure.
///
/// The failure text is only shown in the Development environment.
pub(crate) fn startup_error_router(environment: &HostingEnvironment, error: &BoxError) -> Router {
    let body = if environment.is_development() {
        format!("An error occurred while starting the application.\n\n{error}")
    } else {
        "An error occurred while starting the application.".to_string()
    };

    Router::new().fallback(move || {
        let body = body.clone();
        async move { (StatusCode::INTERNAL_SERVER_ERROR, body) }
    })
}
