//! Error handling for the PocketBase Rust client

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Field-level validation code PocketBase reports for unique-constraint collisions.
const VALIDATION_NOT_UNIQUE: &str = "validation_not_unique";

/// Unified error type for the PocketBase Rust client
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced an HTTP response (connect failure, DNS, timeout)
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered 404
    #[error("Not found ({status}): {message}")]
    NotFound {
        status: u16,
        message: String,
        body: Value,
    },

    /// A field value collides with an existing unique-constrained value
    #[error("Validation not unique ({status}): {message}")]
    ValidationNotUnique {
        status: u16,
        message: String,
        body: Value,
    },

    /// Any other non-2xx response
    #[error("Response error ({status}): {message}")]
    Response {
        status: u16,
        message: String,
        body: Value,
    },

    /// The auth response was missing the token or the record id
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A refresh was attempted without a session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Wrap any transport-level failure
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport(Box::new(err))
    }

    /// HTTP status of a classified response error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound { status, .. }
            | Error::ValidationNotUnique { status, .. }
            | Error::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded response body of a classified response error
    pub fn body(&self) -> Option<&Value> {
        match self {
            Error::NotFound { body, .. }
            | Error::ValidationNotUnique { body, .. }
            | Error::Response { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Server-provided message of a classified response error
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::NotFound { message, .. }
            | Error::ValidationNotUnique { message, .. }
            | Error::Response { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_validation_not_unique(&self) -> bool {
        matches!(self, Error::ValidationNotUnique { .. })
    }

    /// True when the transport gave up waiting for the server
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport(source) => source
                .downcast_ref::<reqwest::Error>()
                .map(reqwest::Error::is_timeout)
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Classify a non-2xx response into the matching error kind.
pub fn classify(status: u16, body: Value) -> Error {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if status == 404 {
        Error::NotFound {
            status,
            message,
            body,
        }
    } else if is_validation_not_unique(&body) {
        Error::ValidationNotUnique {
            status,
            message,
            body,
        }
    } else {
        Error::Response {
            status,
            message,
            body,
        }
    }
}

/// Scan the `data` map one level deep for a field error coded `validation_not_unique`.
///
/// A missing or non-object `data` is simply not a match.
pub fn is_validation_not_unique(body: &Value) -> bool {
    let Some(data) = body.get("data").and_then(Value::as_object) else {
        return false;
    };

    data.values().any(|field| {
        field
            .as_object()
            .and_then(|obj| obj.get("code"))
            .and_then(Value::as_str)
            == Some(VALIDATION_NOT_UNIQUE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn not_found_wins_over_uniqueness() {
        let body = json!({
            "message": "missing",
            "data": { "email": { "code": "validation_not_unique" } }
        });
        let err = classify(404, body);
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), Some("missing"));
    }

    #[test]
    fn uniqueness_detected_in_data_map() {
        let body = json!({
            "code": 400,
            "message": "Failed to create record.",
            "data": {
                "title": { "code": "validation_required", "message": "Missing" },
                "email": { "code": "validation_not_unique", "message": "Value must be unique." }
            }
        });
        let err = classify(400, body);
        assert!(err.is_validation_not_unique());
        assert_eq!(err.message(), Some("Failed to create record."));
    }

    #[test]
    fn wrong_shapes_are_not_uniqueness() {
        assert!(!is_validation_not_unique(&json!({})));
        assert!(!is_validation_not_unique(&json!({ "data": [] })));
        assert!(!is_validation_not_unique(&json!({ "data": "validation_not_unique" })));
        assert!(!is_validation_not_unique(&json!({ "data": { "email": "validation_not_unique" } })));
        assert!(!is_validation_not_unique(&json!({ "data": { "email": { "code": 1 } } })));
        assert!(!is_validation_not_unique(
            &json!({ "data": { "outer": { "inner": { "code": "validation_not_unique" } } } })
        ));
    }

    #[test]
    fn other_statuses_are_generic() {
        let err = classify(500, json!({}));
        assert!(matches!(err, Error::Response { status: 500, .. }));
        assert_eq!(err.message(), Some(""));
        assert_eq!(err.body(), Some(&json!({})));
    }

    #[test]
    fn non_response_errors_have_no_status() {
        assert_eq!(Error::NotAuthenticated.status(), None);
        assert!(Error::auth("no token").body().is_none());
        assert!(!Error::NotAuthenticated.is_timeout());
    }
}
