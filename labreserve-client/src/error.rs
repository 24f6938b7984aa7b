//! Gateway error types

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Gateway error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential rejected or expired (401). The session owner reacts to
    /// this by clearing the session; it is never shown as a form error.
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by server-side validation (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflicting state, e.g. an overlapping reservation (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Server-side failure (5xx) or any other unexpected status
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for gateway operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error body shape the backend uses for 4xx/5xx responses. Both fields
/// are optional; older endpoints fill `error` instead of `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ClientError {
    /// Human-readable message for inline display in a view.
    pub fn message(&self) -> String {
        match self {
            ClientError::Unauthorized => "Authentication required".to_string(),
            ClientError::Forbidden(m)
            | ClientError::NotFound(m)
            | ClientError::Validation(m)
            | ClientError::Conflict(m)
            | ClientError::Internal(m) => m.clone(),
            ClientError::Http(_) => "Network error, please try again".to_string(),
            ClientError::Serialization(_) => "Unexpected response from server".to_string(),
        }
    }

    /// Normalize a non-success response into an error.
    ///
    /// Message preference: server `message` field, then server `error`
    /// field, then a fixed per-status fallback, else the canonical
    /// reason phrase.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> ClientError {
        if status == StatusCode::UNAUTHORIZED {
            return ClientError::Unauthorized;
        }

        let server_message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty());

        let message = server_message.unwrap_or_else(|| fallback_message(status));

        match status {
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            StatusCode::CONFLICT => ClientError::Conflict(message),
            _ => ClientError::Internal(message),
        }
    }
}

fn fallback_message(status: StatusCode) -> String {
    match status {
        StatusCode::FORBIDDEN => "Access denied".to_string(),
        StatusCode::NOT_FOUND => "Resource not found".to_string(),
        s if s.is_server_error() => {
            "Internal server error, contact an administrator".to_string()
        }
        s => s
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_server_message_field() {
        let err = ClientError::from_response(
            StatusCode::CONFLICT,
            r#"{"message":"Lab already reserved","error":"conflict"}"#,
        );
        assert_eq!(err.message(), "Lab already reserved");
    }

    #[test]
    fn falls_back_to_server_error_field() {
        let err = ClientError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"capacity must be positive"}"#,
        );
        assert_eq!(err.message(), "capacity must be positive");
    }

    #[test]
    fn fixed_fallbacks_per_status() {
        let err = ClientError::from_response(StatusCode::FORBIDDEN, "");
        assert_eq!(err.message(), "Access denied");

        let err = ClientError::from_response(StatusCode::NOT_FOUND, "not json");
        assert_eq!(err.message(), "Resource not found");

        let err = ClientError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "{}");
        assert_eq!(err.message(), "Internal server error, contact an administrator");
    }

    #[test]
    fn unauthorized_is_distinguished() {
        let err = ClientError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"token expired"}"#,
        );
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[test]
    fn blank_message_does_not_shadow_fallback() {
        let err = ClientError::from_response(StatusCode::FORBIDDEN, r#"{"message":"  "}"#);
        assert_eq!(err.message(), "Access denied");
    }
}
