use reqwest::StatusCode;
use serde::Deserialize;

/// Errors raised by the Firebase REST clients.
#[derive(Debug, thiserror::Error)]
pub enum FirebaseError {
    #[error("invalid firebase configuration: {0}")]
    InvalidConfig(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FirebaseError {
    /// The HTTP status the backend answered with, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FirebaseError::Api { status, .. } => Some(*status),
            FirebaseError::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Error envelope shared by the Google REST APIs:
/// `{"error": {"code": 400, "message": "INVALID_PASSWORD", ...}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turns a non-success response into `FirebaseError::Api`, keeping the
/// backend's own message when the body carries one.
pub(crate) async fn api_error(response: reqwest::Response) -> FirebaseError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body,
    };
    FirebaseError::Api { status, message }
}
