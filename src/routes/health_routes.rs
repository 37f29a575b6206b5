//! Health check endpoints.

use crate::state::AppState;
use axum::{
    body::Body,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness check for the app shell.
///
/// Always answers 200 with a plain `OK` body; it touches neither the backend
/// nor the auth flag.
async fn health_check() -> impl IntoResponse {
    Response::new(Body::from("OK"))
}
