//! Configuration options for the PocketBase client

use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the base endpoint for [`crate::PocketBase::from_env`]
pub const ENV_URL: &str = "POCKETBASE_URL";
/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "POCKETBASE_TIMEOUT_SECS";
/// Environment variable overriding the default auth duration, in seconds
pub const ENV_AUTH_DURATION_SECS: &str = "POCKETBASE_AUTH_DURATION_SECS";

/// Configuration options for the PocketBase client
///
/// Options are consumed at construction time; a client never changes them afterwards.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Timeout applied to every dispatched request
    pub request_timeout: Duration,

    /// Session validity assumed when a login does not specify one
    pub default_auth_duration: Duration,

    /// How far `refreshed_at` is backdated after a successful auth call
    pub refresh_margin: Duration,

    /// Optional `User-Agent` sent by the default transport
    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            default_auth_duration: Duration::from_secs(24 * 60 * 60),
            refresh_margin: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl ClientOptions {
    /// Defaults overridden by `POCKETBASE_TIMEOUT_SECS` / `POCKETBASE_AUTH_DURATION_SECS` when set
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Some(secs) = read_secs(ENV_TIMEOUT_SECS)? {
            options.request_timeout = secs;
        }
        if let Some(secs) = read_secs(ENV_AUTH_DURATION_SECS)? {
            options.default_auth_duration = secs;
        }
        Ok(options)
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the auth duration used when a login does not pass one
    pub fn with_default_auth_duration(mut self, value: Duration) -> Self {
        self.default_auth_duration = value;
        self
    }

    /// Set the backdating margin for `refreshed_at`
    pub fn with_refresh_margin(mut self, value: Duration) -> Self {
        self.refresh_margin = value;
        self
    }

    /// Set the `User-Agent` header of the default transport
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = Some(value.to_string());
        self
    }
}

fn read_secs(var: &str) -> Result<Option<Duration>> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .map(Some)
            .ok_or_else(|| Error::config(format!("{var} must be a positive number, got {raw:?}"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::config(format!("{var}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.request_timeout, Duration::from_secs(10));
        assert_eq!(options.default_auth_duration, Duration::from_secs(86_400));
        assert_eq!(options.refresh_margin, Duration::from_secs(30));
        assert!(options.user_agent.is_none());
    }

    #[test]
    fn builder_methods() {
        let options = ClientOptions::default()
            .with_request_timeout(Duration::from_millis(250))
            .with_default_auth_duration(Duration::from_secs(60))
            .with_refresh_margin(Duration::ZERO)
            .with_user_agent("pb-test/1.0");
        assert_eq!(options.request_timeout, Duration::from_millis(250));
        assert_eq!(options.default_auth_duration, Duration::from_secs(60));
        assert_eq!(options.refresh_margin, Duration::ZERO);
        assert_eq!(options.user_agent.as_deref(), Some("pb-test/1.0"));
    }

    #[test]
    fn unset_env_var_is_none() {
        assert!(read_secs("POCKETBASE_TEST_DEFINITELY_UNSET").unwrap().is_none());
    }
}
