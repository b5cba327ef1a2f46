//! HTTP transport abstraction for making requests to PocketBase
//!
//! Requests are plain data: the bearer token travels inside each
//! [`FetchRequest`] instead of living on the HTTP client, so a transport
//! keeps no per-session state.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use crate::config::ClientOptions;
use crate::error::{Error, Result};

/// A request as handed to an [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    /// Fully resolved URL, without the query string
    pub url: Url,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Sent verbatim as `Authorization` when present
    pub token: Option<String>,
}

/// Raw response handed back by an [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON; anything undecodable (including an empty body) becomes `{}`.
    pub fn json(&self) -> Value {
        match serde_json::from_slice(&self.body) {
            Ok(value) => value,
            Err(e) => {
                log::trace!(
                    "undecodable response body ({} bytes, status {}): {}",
                    self.body.len(),
                    self.status,
                    e
                );
                Value::Object(Default::default())
            }
        }
    }
}

/// Executes one HTTP round trip.
///
/// Implementations must not retry; a failure to obtain a response is
/// reported as [`Error::Transport`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: FetchRequest) -> Result<FetchResponse>;
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport applying `options.request_timeout` to every request
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(agent) = &options.user_agent {
            let value = HeaderValue::from_str(agent)
                .map_err(|e| Error::config(format!("invalid user agent: {e}")))?;
            headers.insert(USER_AGENT, value);
        }

        let client = Client::builder()
            .timeout(options.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: FetchRequest) -> Result<FetchResponse> {
        let mut req = self.client.request(request.method, request.url);

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(token) = &request.token {
            req = req.header(AUTHORIZATION, auth_header(token)?);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(FetchResponse { status, body })
    }
}

/// `Authorization` value for a token, marked sensitive so it stays out of debug output
pub fn auth_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(token)
        .map_err(|e| Error::auth(format!("token is not a valid header value: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Append `path` to `base`, keeping any sub-path of the endpoint and exactly one `/` between them.
///
/// Query and fragment of `base` are dropped.
pub fn join_url(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.set_path(&format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    ));
    Ok(url)
}
