//! Types for password authentication

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::fetch::auth_header;

/// Regular user identity collection
pub const USERS_COLLECTION: &str = "users";

/// Privileged identity collection
pub const SUPERUSERS_COLLECTION: &str = "_superusers";

/// Wire body of `auth-with-password`
#[derive(Debug, Serialize)]
pub(crate) struct PasswordCredentials<'a> {
    pub identity: &'a str,
    pub password: &'a str,
}

/// Where and for how long to authenticate
#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// Identity collection to authenticate against
    pub collection: String,

    /// Session validity; the client's default when `None`
    pub duration: Option<Duration>,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            collection: USERS_COLLECTION.to_string(),
            duration: None,
        }
    }
}

impl AuthOptions {
    pub fn collection(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            duration: None,
        }
    }

    pub fn superusers() -> Self {
        Self::collection(SUPERUSERS_COLLECTION)
    }

    /// Set the session validity
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// A successful auth response: `{token, record: {id, collectionName?, ...}}`
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    /// The bearer token
    pub token: String,

    /// The authenticated record, as returned by the server
    pub record: Value,
}

impl AuthResponse {
    /// Validate a decoded auth response.
    ///
    /// A missing token, a token unusable as a header value, or a missing
    /// record id is an [`Error::Auth`].
    pub fn from_value(mut value: Value) -> Result<Self> {
        let token = match value.get("token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => return Err(Error::auth("token not found in authentication result")),
        };
        auth_header(&token)?;

        let record = value
            .get_mut("record")
            .map(Value::take)
            .unwrap_or(Value::Null);

        match record.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {}
            _ => return Err(Error::auth("record id not found in authentication result")),
        }

        Ok(Self { token, record })
    }

    /// Id of the authenticated record
    pub fn record_id(&self) -> &str {
        self.record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Collection name reported by the server, if any
    pub fn collection_name(&self) -> Option<&str> {
        self.record
            .get("collectionName")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_token_and_record() {
        let response = AuthResponse::from_value(json!({
            "token": "abc",
            "record": { "id": "u1", "collectionName": "_superusers", "email": "a@b.c" }
        }))
        .unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.record_id(), "u1");
        assert_eq!(response.collection_name(), Some("_superusers"));
        assert_eq!(response.record["email"], "a@b.c");
    }

    #[test]
    fn missing_token_is_auth_error() {
        let err = AuthResponse::from_value(json!({ "record": { "id": "u1" } })).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        let err = AuthResponse::from_value(json!({ "token": "", "record": { "id": "u1" } }))
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        let err =
            AuthResponse::from_value(json!({ "token": "bad\ntoken", "record": { "id": "u1" } }))
                .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn missing_record_id_is_auth_error() {
        let err = AuthResponse::from_value(json!({ "token": "abc" })).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        let err = AuthResponse::from_value(json!({ "token": "abc", "record": { "id": 7 } }))
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn collection_name_is_optional() {
        let response =
            AuthResponse::from_value(json!({ "token": "abc", "record": { "id": "u1" } })).unwrap();
        assert_eq!(response.collection_name(), None);
    }

    #[test]
    fn options_default_to_users() {
        let options = AuthOptions::default();
        assert_eq!(options.collection, "users");
        assert!(options.duration.is_none());

        let options = AuthOptions::superusers().with_duration(Duration::from_secs(60));
        assert_eq!(options.collection, "_superusers");
        assert_eq!(options.duration, Some(Duration::from_secs(60)));
    }
}
