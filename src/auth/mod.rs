//! Password authentication and session lifecycle

mod session;
mod types;

use chrono::Utc;
use reqwest::Method;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::PocketBase;

pub use session::*;
pub use types::*;

fn collection_auth_path(collection: &str, action: &str) -> String {
    format!(
        "/api/collections/{}/{}",
        urlencoding::encode(collection),
        action
    )
}

impl PocketBase {
    /// Current session; empty when unauthenticated
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.authenticated()
    }

    /// Sign in a record of the `users` collection
    pub async fn auth_with_password(
        &mut self,
        identity: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        self.auth_with_password_options(identity, password, AuthOptions::default())
            .await
    }

    /// Sign in a record of the `_superusers` collection
    pub async fn auth_as_superuser(&mut self, email: &str, password: &str) -> Result<AuthResponse> {
        self.auth_with_password_options(email, password, AuthOptions::superusers())
            .await
    }

    /// Sign in against any identity collection.
    ///
    /// On success the session is replaced; on any failure it is left untouched.
    pub async fn auth_with_password_options(
        &mut self,
        identity: &str,
        password: &str,
        options: AuthOptions,
    ) -> Result<AuthResponse> {
        let path = collection_auth_path(&options.collection, "auth-with-password");
        let body = serde_json::to_value(PasswordCredentials { identity, password })?;

        let value = self.send(&path, Method::POST, None, Some(body)).await?;
        let response = AuthResponse::from_value(value)?;

        let duration = options
            .duration
            .unwrap_or(self.options.default_auth_duration);
        self.replace_session(&response, &options.collection, duration);

        Ok(response)
    }

    /// Refresh the current session against its own collection, keeping its duration
    pub async fn auth_refresh(&mut self) -> Result<AuthResponse> {
        if !self.session.authenticated() {
            return Err(Error::NotAuthenticated);
        }

        let collection = self.session.collection_name().to_string();
        let duration = self.session.auth_duration();
        let path = collection_auth_path(&collection, "auth-refresh");

        let value = self.send(&path, Method::POST, None, None).await?;
        let response = AuthResponse::from_value(value)?;

        self.replace_session(&response, &collection, duration);

        Ok(response)
    }

    /// Drop the current session without contacting the server
    pub fn clear_auth(&mut self) {
        log::debug!("clearing session for collection {:?}", self.session.collection_name());
        self.session = Session::default();
    }

    fn replace_session(&mut self, response: &AuthResponse, fallback_collection: &str, duration: Duration) {
        let collection_name = response
            .collection_name()
            .unwrap_or(fallback_collection)
            .to_string();

        let margin = chrono::Duration::from_std(self.options.refresh_margin)
            .unwrap_or_else(|_| chrono::Duration::zero());
        let now = Utc::now();
        let refreshed_at = now.checked_sub_signed(margin).unwrap_or(now);

        log::debug!(
            "session replaced: record {} in collection {} (valid for {:?})",
            response.record_id(),
            collection_name,
            duration
        );

        self.session = Session::new(
            response.token.clone(),
            response.record_id().to_string(),
            collection_name,
            refreshed_at,
            duration,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_paths() {
        assert_eq!(
            collection_auth_path("users", "auth-with-password"),
            "/api/collections/users/auth-with-password"
        );
        assert_eq!(
            collection_auth_path("_superusers", "auth-refresh"),
            "/api/collections/_superusers/auth-refresh"
        );
    }
}
