//! HTTP request types for the Deezer client.
//!
//! This module provides the [`HttpRequest`] type and its builder, plus the
//! ordered [`QueryParams`] collection used for both the initial request of
//! a collection and the cursor requests parsed from `next` URLs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP methods used by the Deezer API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET method for reading resources.
    Get,
    /// HTTP POST method for adding to collections and creating resources.
    Post,
    /// HTTP DELETE method for removing from collections.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Ordered query parameters.
///
/// Keys may repeat; insertion order is preserved on the wire.
///
/// # Example
///
/// ```rust
/// use deezer::clients::QueryParams;
///
/// let mut params = QueryParams::new();
/// params.insert("q", "daft punk");
/// params.set("limit", "1");
/// params.set("limit", "25");
///
/// assert_eq!(params.get("limit"), Some("25"));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parameter, keeping any existing values for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Sets a parameter, replacing every existing value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        self.0.retain(|(k, _)| *k != key);
        self.0.push((key, value.to_string()));
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the parameters in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the parameters as key/value pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// An HTTP request to be sent to the Deezer API.
///
/// Deezer takes write arguments as query parameters, so requests carry no body.
///
/// # Example
///
/// ```rust
/// use deezer::clients::{HttpRequest, HttpMethod};
///
/// let request = HttpRequest::builder(HttpMethod::Post, "user/me/tracks")
///     .query_param("track_id", 3135556)
///     .build();
///
/// assert_eq!(request.path, "user/me/tracks");
/// assert_eq!(request.query.get("track_id"), Some("3135556"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path relative to the API base URL, without a leading slash.
    pub path: String,
    /// Query parameters to append to the URL.
    pub query: QueryParams,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    query: QueryParams,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            query: QueryParams::new(),
        }
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Adds a single query parameter, replacing any previous value.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.set(key, value);
        self
    }

    /// Builds the [`HttpRequest`], normalizing the path.
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            http_method: self.http_method,
            path: self.path.trim_start_matches('/').to_string(),
            query: self.query,
        }
    }
}
