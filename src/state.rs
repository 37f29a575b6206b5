//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration, the Firebase handles and the navigator.

use crate::config::ConfigV1;
use crate::firebase::FirebaseApp;
use crate::navigation::Navigator;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Auth, document store and blob store clients for the project.
    pub firebase: Arc<FirebaseApp>,
    /// Route table, guard and the auth flag it reads.
    pub navigator: Arc<Navigator>,
}
