//! App shell: serves the navigable views through the navigator.

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, error};

use crate::navigation::{Outcome, RouteTarget};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers the shell as the router's fallback so it sees every other path.
pub fn routes() -> Router<AppState> {
    Router::new().fallback(navigate)
}

/// What the client renders for a resolved path.
#[derive(Serialize)]
struct ViewResponse {
    path: String,
    name: Option<&'static str>,
    view: &'static str,
    layout: Option<&'static str>,
    requires_auth: bool,
}

/// Resolves the request path. A redirected navigation is answered with a
/// temporary redirect to where it ended up; the client then asks for that path.
/// The query string is carried over to the redirect target. Fragments never
/// reach the server and are left to the client.
async fn navigate(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return HTTPError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    let navigation = match state.navigator.navigate(uri.path()) {
        Ok(navigation) => navigation,
        Err(e) => {
            error!("Navigation failed: {}", e);
            return HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    if navigation.redirected() {
        debug!(
            requested = navigation.requested.as_str(),
            path = navigation.path.as_str(),
            "redirecting navigation"
        );
        let target = match uri.query().filter(|q| !q.is_empty()) {
            Some(query) => format!("{}?{}", navigation.path, query),
            None => navigation.path,
        };
        return Redirect::temporary(&target).into_response();
    }

    match navigation.outcome {
        Outcome::Route(entry) => match entry.target {
            RouteTarget::View(view) => Json(ViewResponse {
                path: navigation.path,
                name: entry.name,
                view: view.component(),
                layout: entry.layout.map(|l| l.component()),
                requires_auth: entry.requires_auth,
            })
            .into_response(),
            // The navigator follows redirects and never returns layouts.
            RouteTarget::Redirect(_) | RouteTarget::Layout(_) => {
                HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Unresolved route").into_response()
            }
        },
        Outcome::NotFound => HTTPError::new(
            StatusCode::NOT_FOUND,
            format!("No view for {}", navigation.path),
        )
        .into_response(),
    }
}
