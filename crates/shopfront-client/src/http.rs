//! # HTTP Client
//!
//! Thin JSON client for the storefront REST API.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ApiClient::request                               │
//! │                                                                         │
//! │  ApiRequest { method, endpoint, query, body, headers }                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  URL     = base_url + endpoint (+ ?query)                              │
//! │  Headers = Content-Type: application/json                              │
//! │            Authorization: Bearer <token>   (token present in storage)  │
//! │            x-request-id: <uuid v4>                                     │
//! │            caller headers (override the above)                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  send ──► transport error ──► error! log ──► ClientError::Transport    │
//! │        │                                                                │
//! │        ├──► status not 2xx ─────────────────► ClientError::Status      │
//! │        │                                                                │
//! │        └──► body parsed as JSON (empty body = null)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::storage::{KeyValueStore, TOKEN_KEY};

/// Correlation header attached to every request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Request Description
// =============================================================================

/// One API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path appended to the base URL, e.g. `/products/7`.
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Extra headers. These win over the defaults.
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        ApiRequest {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Serializes `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, pairs: &[(String, String)]) -> Self {
        self.query.extend_from_slice(pairs);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

// =============================================================================
// API Client
// =============================================================================

/// JSON client bound to one base URL and one token store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Builds a client from API settings.
    ///
    /// ## Errors
    /// Invalid base URL or a TLS backend that fails to initialize.
    pub fn new(settings: &ApiSettings, storage: Arc<dyn KeyValueStore>) -> ClientResult<Self> {
        Url::parse(&settings.base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(ApiClient {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint plus query pairs.
    pub fn url_for(&self, endpoint: &str, query: &[(String, String)]) -> ClientResult<Url> {
        let separator = if endpoint.starts_with('/') { "" } else { "/" };
        let mut url = Url::parse(&format!("{}{}{}", self.base_url, separator, endpoint))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    fn headers_for(&self, request: &ApiRequest, request_id: &str) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.storage.get(TOKEN_KEY)? {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let id = HeaderValue::from_str(request_id)
            .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), id);

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// Sends a request and returns the parsed JSON body.
    pub async fn request(&self, request: ApiRequest) -> ClientResult<Value> {
        let url = self.url_for(&request.endpoint, &request.query)?;
        let request_id = Uuid::new_v4().to_string();
        let headers = self.headers_for(&request, &request_id)?;

        debug!(method = %request.method, %url, %request_id, "API request");

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(|e| {
            error!(method = %request.method, %url, %request_id, error = %e, "API request failed");
            ClientError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(method = %request.method, %url, %request_id, status = status.as_u16(), "API error status");
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(method = %request.method, %url, %request_id, error = %e, "Reading API response failed");
            ClientError::Transport(e)
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends a request and decodes the body into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let value = self.request(request).await?;
        Ok(serde_json::from_value(value)?)
    }
}
