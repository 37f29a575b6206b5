use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTH_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://firebasestorage.googleapis.com";

/// The web app credentials copied from the Firebase console.
///
/// Immutable after load. The endpoint overrides exist so the clients can be
/// pointed at the emulator suite or a test server; left unset they resolve to
/// the public Google endpoints.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    #[serde(default)]
    pub measurement_id: Option<String>,

    #[serde(default)]
    pub auth_endpoint: Option<String>,
    #[serde(default)]
    pub firestore_endpoint: Option<String>,
    #[serde(default)]
    pub storage_endpoint: Option<String>,
}

impl FirebaseConfig {
    /// Checks the fields every client needs. The backend would reject a
    /// request without them anyway; catching it here keeps the failure at startup.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("api_key", &self.api_key),
            ("project_id", &self.project_id),
            ("app_id", &self.app_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("firebase.{} must not be empty", field));
            }
        }
        Ok(())
    }

    pub fn auth_endpoint(&self) -> &str {
        endpoint_or(&self.auth_endpoint, DEFAULT_AUTH_ENDPOINT)
    }

    pub fn firestore_endpoint(&self) -> &str {
        endpoint_or(&self.firestore_endpoint, DEFAULT_FIRESTORE_ENDPOINT)
    }

    pub fn storage_endpoint(&self) -> &str {
        endpoint_or(&self.storage_endpoint, DEFAULT_STORAGE_ENDPOINT)
    }
}

fn endpoint_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(|v| v.trim_end_matches('/'))
        .unwrap_or(default)
}
