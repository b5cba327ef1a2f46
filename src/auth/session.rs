//! Session state for authentication

use chrono::{DateTime, Utc};
use std::time::Duration;

/// The authenticated identity of one client instance.
///
/// A session is never edited in place: every successful login or refresh
/// replaces it wholesale. The default value is the empty, unauthenticated
/// session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: String,
    owner_id: String,
    collection_name: String,
    refreshed_at: DateTime<Utc>,
    auth_duration: Duration,
}

impl Session {
    /// Create a new session
    pub fn new(
        token: String,
        owner_id: String,
        collection_name: String,
        refreshed_at: DateTime<Utc>,
        auth_duration: Duration,
    ) -> Self {
        Self {
            token,
            owner_id,
            collection_name,
            refreshed_at,
            auth_duration,
        }
    }

    /// The bearer credential, empty when unauthenticated
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Id of the authenticated record
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Identity collection the session belongs to
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Timestamp of the last successful (re)authentication, already backdated
    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    pub fn auth_duration(&self) -> Duration {
        self.auth_duration
    }

    pub fn authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// When the session stops being valid; `None` if the duration overflows the calendar
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let duration = chrono::Duration::from_std(self.auth_duration).ok()?;
        self.refreshed_at.checked_add_signed(duration)
    }

    /// Check if the session has expired
    pub fn expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// `now - refreshed_at >= auth_duration`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at(refreshed_at: DateTime<Utc>, secs: u64) -> Session {
        Session::new(
            "tok".to_string(),
            "rec1".to_string(),
            "users".to_string(),
            refreshed_at,
            Duration::from_secs(secs),
        )
    }

    #[test]
    fn empty_session_is_unauthenticated() {
        let session = Session::default();
        assert!(!session.authenticated());
        assert!(session.token().is_empty());
        assert!(session.owner_id().is_empty());
        assert!(session.expired());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let refreshed_at = Utc::now();
        let session = session_at(refreshed_at, 60);
        assert!(session.authenticated());
        assert!(!session.is_expired_at(refreshed_at + chrono::Duration::seconds(59)));
        assert!(session.is_expired_at(refreshed_at + chrono::Duration::seconds(60)));
        assert!(session.is_expired_at(refreshed_at + chrono::Duration::seconds(61)));
    }

    #[test]
    fn fresh_session_is_not_expired() {
        let session = session_at(Utc::now(), 3600);
        assert!(!session.expired());
        assert_eq!(
            session.expires_at(),
            Some(session.refreshed_at() + chrono::Duration::seconds(3600))
        );
    }

    #[test]
    fn huge_duration_never_expires() {
        let session = session_at(Utc::now(), u64::MAX);
        assert_eq!(session.expires_at(), None);
        assert!(!session.expired());
    }
}
