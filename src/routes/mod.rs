//! HTTP route definitions and handlers.
//!
//! The app shell serves every navigable path through the navigator; the
//! session endpoints drive sign-in and sign-out against the auth backend.

mod health_routes;
mod session_routes;
mod shell_routes;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Anything not claimed by the API or health routes falls through to the
/// app shell.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(session_routes::routes())
        .merge(health_routes::routes())
        .merge(shell_routes::routes())
        .with_state(state)
}
