//! HTTP client for Deezer API communication.
//!
//! This module provides [`HttpClient`], the reqwest-backed [`Transport`].

use std::collections::HashMap;

use async_trait::async_trait;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::Transport;
use crate::config::ClientConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Deezer API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers including User-Agent and custom headers
/// - The `access_token` query parameter when a token is configured
/// - Status classification into [`HttpError`] variants
///
/// Retries are left to the caller; see [`HttpError::is_retryable`].
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use deezer::clients::{HttpClient, HttpRequest, HttpMethod, Transport};
/// use deezer::ClientConfig;
///
/// let client = HttpClient::new(&ClientConfig::default())?;
/// let request = HttpRequest::builder(HttpMethod::Get, "album/302127").build();
/// let response = client.send(request).await?;
/// println!("{}", response.body["title"]);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL (e.g., `https://api.deezer.com`).
    base_url: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Access token appended as a query parameter.
    access_token: Option<String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Deezer Rust API Wrapper v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        for (key, value) in config.headers() {
            default_headers.insert(key.clone(), value.clone());
        }

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            base_url: config.base_url().as_ref().to_string(),
            default_headers,
            access_token: config.access_token().map(|t| t.as_ref().to_string()),
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Builds the absolute URL for a request path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = self.url_for(&request.path);

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        let mut query = request.query.clone();
        if let Some(token) = &self.access_token {
            query.set("access_token", token);
        }
        if !query.is_empty() {
            req_builder = req_builder.query(query.as_pairs());
        }

        tracing::debug!(method = %request.http_method, path = %request.path, "sending request");
        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        if !(200..300).contains(&code) {
            tracing::debug!(code, path = %request.path, "request failed");
            return Err(HttpError::from_status(code, url, body_text));
        }

        let body = if body_text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body_text).map_err(|e| HttpError::InvalidBody {
                url: url.clone(),
                reason: e.to_string(),
            })?
        };

        Ok(HttpResponse::new(code, res_headers, body))
    }
}
