//! Session endpoints: sign in, register, sign out, and the current state.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::firebase::{AuthUser, FirebaseError};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(session))
        .route("/api/session/login", post(login))
        .route("/api/session/register", post(register))
        .route("/api/session/logout", post(logout))
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    authenticated: bool,
    user: Option<AuthUser>,
}

#[derive(Serialize)]
struct UserResponse {
    user: AuthUser,
}

/// Maps backend failures to responses: a rejection by the auth backend is the
/// caller's problem (`rejected`), anything else is an upstream failure.
fn map_auth_error(e: FirebaseError, rejected: StatusCode) -> HTTPError {
    match e {
        FirebaseError::Api { status, message } if status.is_client_error() => {
            HTTPError::new(rejected, message)
        }
        other => {
            warn!("Auth backend error: {}", other);
            HTTPError::new(StatusCode::BAD_GATEWAY, "Authentication backend unavailable")
        }
    }
}

/// Reports the navigator's view of the session next to the auth client's user.
async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: state.navigator.auth_flag().snapshot(),
        user: state.firebase.auth().current_user(),
    })
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<UserResponse>, HTTPError> {
    let user = state
        .firebase
        .auth()
        .sign_in_with_password(&credentials.email, &credentials.password)
        .await
        .map_err(|e| map_auth_error(e, StatusCode::UNAUTHORIZED))?;
    info!("Signed in user '{}'", user.uid);
    Ok(Json(UserResponse { user }))
}

async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<UserResponse>), HTTPError> {
    let user = state
        .firebase
        .auth()
        .sign_up(&credentials.email, &credentials.password)
        .await
        .map_err(|e| map_auth_error(e, StatusCode::BAD_REQUEST))?;
    info!("Registered user '{}'", user.uid);
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

async fn logout(State(state): State<AppState>) -> StatusCode {
    state.firebase.auth().sign_out();
    StatusCode::NO_CONTENT
}
