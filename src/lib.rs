//! PocketBase Rust Client Library
//!
//! A Rust client for PocketBase record and authentication APIs: record CRUD,
//! list queries and password-based sessions over HTTP/JSON.
//!
//! Every operation is one request/response round trip. Nothing is retried;
//! retry and backoff are left to the caller.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod records;

use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::auth::Session;
use crate::config::ClientOptions;
use crate::error::{classify, Error, Result};
use crate::fetch::{join_url, FetchRequest, HttpTransport, ReqwestTransport};
use crate::records::{Collection, CollectionHandle, Params};

/// The main entry point for the PocketBase Rust client
///
/// A client owns exactly one [`Session`]. Methods that replace it take
/// `&mut self`, so a client cannot log in while requests borrowing it are
/// in flight.
pub struct PocketBase {
    base_url: Url,
    options: ClientOptions,
    transport: Arc<dyn HttpTransport>,
    session: Session,
    collections: Mutex<HashMap<String, Arc<CollectionHandle>>>,
}

impl PocketBase {
    /// Create a new PocketBase client
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the PocketBase server
    ///
    /// # Example
    ///
    /// ```
    /// use pocketbase_rust_client::PocketBase;
    ///
    /// let pb = PocketBase::new("http://127.0.0.1:8090").unwrap();
    /// assert!(!pb.is_authenticated());
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new PocketBase client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use pocketbase_rust_client::{PocketBase, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_request_timeout(Duration::from_secs(5));
    /// let pb = PocketBase::new_with_options("http://127.0.0.1:8090", options).unwrap();
    /// ```
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Result<Self> {
        let transport = ReqwestTransport::new(&options)?;
        Self::with_transport(base_url, options, Arc::new(transport))
    }

    /// Create a client that sends through a custom transport
    pub fn with_transport(
        base_url: &str,
        options: ClientOptions,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("{base_url} cannot be used as a base URL")));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(Error::config(format!(
                "{base_url} must not carry a query string or fragment"
            )));
        }

        Ok(Self {
            base_url,
            options,
            transport,
            session: Session::default(),
            collections: Mutex::new(HashMap::new()),
        })
    }

    /// Create a client from `POCKETBASE_URL` and the optional tuning variables of [`ClientOptions::from_env`]
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(config::ENV_URL)
            .map_err(|_| Error::config(format!("{} environment variable not found", config::ENV_URL)))?;
        Self::new_with_options(&url, ClientOptions::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Record operations for a collection, addressed by id or name
    ///
    /// # Example
    ///
    /// ```
    /// use pocketbase_rust_client::PocketBase;
    ///
    /// let pb = PocketBase::new("http://127.0.0.1:8090").unwrap();
    /// let messages = pb.collection("messages");
    /// assert_eq!(messages.handle().base_path(), "/api/collections/messages/records");
    /// ```
    pub fn collection(&self, id_or_name: &str) -> Collection<'_> {
        let handle = {
            let mut collections = self
                .collections
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            collections
                .entry(id_or_name.to_string())
                .or_insert_with(|| Arc::new(CollectionHandle::new(id_or_name)))
                .clone()
        };
        Collection::new(self, handle)
    }

    /// Send one request to `path` (relative to the base URL) and decode the JSON response.
    ///
    /// The session token is attached when authenticated. Non-2xx responses
    /// are classified into [`Error::NotFound`], [`Error::ValidationNotUnique`]
    /// or [`Error::Response`]; an undecodable body counts as `{}`.
    pub async fn send(
        &self,
        path: &str,
        method: Method,
        params: Option<&Params>,
        body: Option<Value>,
    ) -> Result<Value> {
        let url = join_url(&self.base_url, path)?;
        let token = self
            .session
            .authenticated()
            .then(|| self.session.token().to_string());

        log::debug!(
            "{} {} (authenticated: {})",
            method,
            url.path(),
            token.is_some()
        );

        let request = FetchRequest {
            method: method.clone(),
            url,
            query: params.map(Params::to_query).unwrap_or_default(),
            body,
            token,
        };

        let response = self.transport.send(request).await?;
        let value = response.json();

        if !response.is_success() {
            let err = classify(response.status, value);
            log::warn!("{} {} failed: {}", method, path, err);
            return Err(err);
        }

        Ok(value)
    }
}

impl fmt::Debug for PocketBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PocketBase")
            .field("base_url", &self.base_url.as_str())
            .field("options", &self.options)
            .field("authenticated", &self.session.authenticated())
            .field("collection", &self.session.collection_name())
            .finish()
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{AuthOptions, AuthResponse, Session};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::records::{ListResult, Params, Record};
    pub use crate::PocketBase;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_is_unauthenticated() {
        let pb = PocketBase::new("http://127.0.0.1:8090").unwrap();
        assert!(!pb.is_authenticated());
        assert_eq!(pb.session(), &Session::default());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(PocketBase::new("not a url"), Err(Error::Url(_))));
        assert!(matches!(PocketBase::new("mailto:a@b.c"), Err(Error::Config(_))));
        assert!(matches!(
            PocketBase::new("https://example.com/pb/?tenant=a"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PocketBase::new("https://example.com/pb/#top"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn collection_handles_are_memoized() {
        let pb = PocketBase::new("http://127.0.0.1:8090").unwrap();
        let first = pb.collection("messages");
        let second = pb.collection("messages");
        let other = pb.collection("users");
        assert!(Arc::ptr_eq(first.handle(), second.handle()));
        assert!(!Arc::ptr_eq(first.handle(), other.handle()));
    }

    #[test]
    fn debug_output_hides_token() {
        let pb = PocketBase::new("http://127.0.0.1:8090").unwrap();
        let debug = format!("{pb:?}");
        assert!(debug.contains("authenticated: false"));
        assert!(!debug.contains("token"));
    }
}
