use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use super::auth::AuthClient;
use super::error::FirebaseError;
use super::firestore::FirestoreClient;
use super::storage::StorageClient;
use crate::config::FirebaseConfig;

/// Handles for one Firebase project.
///
/// The three clients share one HTTP connection pool. The document and blob
/// clients follow the auth client's current user so their requests are made
/// on behalf of whoever is signed in.
pub struct FirebaseApp {
    config: FirebaseConfig,
    auth: Arc<AuthClient>,
    firestore: Arc<FirestoreClient>,
    storage: Arc<StorageClient>,
}

impl FirebaseApp {
    /// Validates the configuration and builds the clients.
    pub fn initialize(config: &FirebaseConfig) -> Result<Self, FirebaseError> {
        config.validate().map_err(FirebaseError::InvalidConfig)?;

        info!(
            "Initializing firebase app '{}' for project '{}'",
            config.app_id, config.project_id
        );

        let http = Client::builder()
            .user_agent(concat!("campusgate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let auth = AuthClient::new(http.clone(), config.auth_endpoint(), &config.api_key);
        let firestore = FirestoreClient::new(
            http.clone(),
            config.firestore_endpoint(),
            &config.project_id,
            &config.api_key,
            auth.on_auth_state_changed(),
        );
        let storage = StorageClient::new(
            http,
            config.storage_endpoint(),
            &config.storage_bucket,
            auth.on_auth_state_changed(),
        );

        Ok(Self {
            config: config.clone(),
            auth: Arc::new(auth),
            firestore: Arc::new(firestore),
            storage: Arc::new(storage),
        })
    }

    pub fn config(&self) -> &FirebaseConfig {
        &self.config
    }

    pub fn auth(&self) -> Arc<AuthClient> {
        self.auth.clone()
    }

    pub fn firestore(&self) -> Arc<FirestoreClient> {
        self.firestore.clone()
    }

    pub fn storage(&self) -> Arc<StorageClient> {
        self.storage.clone()
    }
}
