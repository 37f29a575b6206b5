//! Application startup and server initialization.
//!
//! Builds the Firebase handles, wires the auth state listener into the
//! navigator's flag, and serves the app shell.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::firebase::{FirebaseApp, FirebaseError};
use crate::navigation::{spawn_auth_listener, AuthFlag, Navigator, RouteTable};
use crate::routes;
use crate::state::AppState;

/// Creates the shared state: Firebase clients, the auth flag fed by the
/// auth client's state changes, and the navigator reading that flag.
///
/// Must be called inside a Tokio runtime, since it spawns the auth listener.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, FirebaseError> {
    let firebase = Arc::new(FirebaseApp::initialize(&config.firebase)?);

    let flag = AuthFlag::new();
    spawn_auth_listener(firebase.auth().on_auth_state_changed(), flag.clone());

    let navigator = Arc::new(Navigator::new(RouteTable::campus(), flag));

    Ok(AppState {
        config,
        firebase,
        navigator,
    })
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the Firebase configuration is rejected, the server
/// fails to bind to the configured address, or serving fails.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone())?;
    let app = routes::create_router(state);

    info!("Starting server on {}", config.bind_address);
    let listener = TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
