use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

/// Liveness and readiness probes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/readiness", get(readiness))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn readiness() -> StatusCode {
    StatusCode::OK
}
