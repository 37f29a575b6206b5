use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::{api_error, FirebaseError};

/// A signed-in account as reported by the Identity Toolkit.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub id_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    /// Seconds, sent as a string.
    #[serde(default)]
    expires_in: Option<String>,
}

impl PasswordResponse {
    fn into_user(self, fallback_email: &str) -> AuthUser {
        let ttl = self
            .expires_in
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(3600);
        AuthUser {
            uid: self.local_id,
            email: if self.email.is_empty() {
                fallback_email.to_string()
            } else {
                self.email
            },
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now() + Duration::seconds(ttl),
        }
    }
}

/// Email/password authentication against the Identity Toolkit REST API.
///
/// Holds the current user; every sign-in, sign-up or sign-out publishes the
/// new value to subscribers of [`AuthClient::on_auth_state_changed`].
pub struct AuthClient {
    http: Client,
    endpoint: String,
    api_key: String,
    current: watch::Sender<Option<AuthUser>>,
}

impl AuthClient {
    pub(crate) fn new(http: Client, endpoint: &str, api_key: &str) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            current,
        }
    }

    /// Signs an existing account in and makes it the current user.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, FirebaseError> {
        let user = self
            .password_call("accounts:signInWithPassword", email, password)
            .await?;
        info!(uid = user.uid.as_str(), "user signed in");
        self.publish(Some(user.clone()));
        Ok(user)
    }

    /// Creates a new account; the backend signs it in straight away.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, FirebaseError> {
        let user = self.password_call("accounts:signUp", email, password).await?;
        info!(uid = user.uid.as_str(), "user registered");
        self.publish(Some(user.clone()));
        Ok(user)
    }

    /// Forgets the current user. Purely local, no backend call.
    pub fn sign_out(&self) {
        if let Some(user) = self.current_user() {
            info!(uid = user.uid.as_str(), "user signed out");
        }
        self.publish(None);
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.current.borrow().clone()
    }

    /// Subscribes to auth state changes. The receiver starts at the current
    /// value; each change after that is observable with `changed().await`.
    pub fn on_auth_state_changed(&self) -> watch::Receiver<Option<AuthUser>> {
        self.current.subscribe()
    }

    fn publish(&self, user: Option<AuthUser>) {
        self.current.send_replace(user);
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, FirebaseError> {
        let url = format!("{}/v1/{}", self.endpoint, method);
        debug!("Sending identity toolkit request to: {}", url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            warn!(method, "identity toolkit rejected request: {}", err);
            return Err(err);
        }

        let body: PasswordResponse = response
            .json()
            .await
            .map_err(|e| FirebaseError::Decode(format!("identity toolkit response: {}", e)))?;
        Ok(body.into_user(email))
    }
}
