//! HTTP layer
//! - error.rs: error codes and JSON error responses
//! - health.rs: liveness and readiness probes
//! - packages.rs: group packages endpoint
//! - server.rs: service wiring and the serve loop

pub mod error;
pub mod health;
pub mod packages;
pub mod server;

use std::sync::Arc;

use axum::Router;

use crate::packages::GroupPackageGetter;

pub type AppState = Arc<dyn GroupPackageGetter>;

/// Build the service router
///
/// The packages endpoint is served both at the root and under `/api/v1`.
pub fn router(getter: AppState) -> Router {
    Router::new()
        .nest("/check", health::router())
        .nest("/api/v1", packages::router())
        .merge(packages::router())
        .with_state(getter)
}
