//! Client-facing error taxonomy.
//!
//! Configuration and decode errors are programmer-visible bugs and carry as
//! much context as we can give them; transport and server errors are expected
//! operational conditions that the UI layer renders to the user.

use serde::Deserialize;
use thiserror::Error;

/// API error type for client-side use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No session token is available. Callers should prompt for sign-in.
    #[error("not authenticated")]
    Unauthenticated,
    /// A required piece of local configuration (library id, endpoint URL) is
    /// missing. Never retried automatically.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),
    /// Connectivity, DNS, or TLS failure.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response. The status code is kept so callers can branch,
    /// e.g. treat 401 as a re-auth prompt.
    #[error("server error (status {status}): {message}")]
    Http { status: u16, message: String },
    /// 2xx response whose body did not match the expected shape. Distinct
    /// from `Http`: this is a contract mismatch, not a server failure.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// The HTTP status code, for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the caller should re-authenticate.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
            || matches!(self, ApiError::Http { status: 401, .. })
    }
}

/// Structured error body the backend sends on failures:
/// `{"success": false, "error": {"message": "..."}}`, with older endpoints
/// using a flat `{"message": "..."}` or `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorField>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Structured { message: String },
    Plain(String),
}

/// Attempt to pull a human-readable message out of an error response body.
pub fn try_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;
    let message = match parsed.error {
        Some(ErrorField::Structured { message }) => Some(message),
        Some(ErrorField::Plain(message)) => Some(message),
        None => parsed.message,
    }?;
    if message.trim().is_empty() {
        return None;
    }
    Some(message)
}

/// Classify a non-2xx response into an [`ApiError::Http`]: structured message
/// when the body parses, raw body text when it does not, generic fallback
/// when the body is empty.
pub fn classify_error_body(status: u16, body: &str) -> ApiError {
    let message = match try_error_message(body) {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => format!("server error (status {status})"),
    };
    ApiError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_structured_error_message() {
        let err = classify_error_body(
            422,
            r#"{"success":false,"error":{"message":"isbn already exists"}}"#,
        );
        assert_eq!(
            err,
            ApiError::Http { status: 422, message: "isbn already exists".into() }
        );
    }

    #[test]
    fn accepts_flat_message_and_error_fields() {
        assert_eq!(
            try_error_message(r#"{"message":"nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(
            try_error_message(r#"{"error":"bad token"}"#).as_deref(),
            Some("bad token")
        );
    }

    #[test]
    fn falls_back_to_raw_body() {
        let err = classify_error_body(500, "upstream timeout");
        assert_eq!(
            err,
            ApiError::Http { status: 500, message: "upstream timeout".into() }
        );
    }

    #[test]
    fn empty_body_gets_generic_message() {
        let err = classify_error_body(503, "  ");
        assert_eq!(
            err,
            ApiError::Http { status: 503, message: "server error (status 503)".into() }
        );
    }

    #[test]
    fn auth_errors_are_recognized() {
        assert!(ApiError::Unauthenticated.is_auth_error());
        assert!(classify_error_body(401, "").is_auth_error());
        assert!(!classify_error_body(404, "").is_auth_error());
    }
}
