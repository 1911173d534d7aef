//! HTTP-specific error types for the Deezer client.
//!
//! This module contains the transport error taxonomy. Status failures are
//! split so callers can retry only the subset that may succeed later:
//!
//! - [`HttpError::NotFound`]: 404 responses
//! - [`HttpError::Forbidden`]: 403 responses
//! - [`HttpError::Retryable`]: 502, 503 and 504 responses
//! - [`HttpError::Response`]: any other non-2xx response
//! - [`HttpError::Network`]: the request never produced a response
//!
//! # Example
//!
//! ```rust,ignore
//! use deezer::clients::HttpError;
//!
//! match client.get_album(302127).await {
//!     Err(ResourceError::Http(e)) if e.is_retryable() => { /* try again later */ }
//!     Err(ResourceError::Http(HttpError::NotFound(e))) => println!("gone: {}", e.url),
//!     other => { /* ... */ }
//! }
//! ```

use thiserror::Error;

/// Details of a non-successful HTTP response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code} for {url}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The URL that was requested.
    pub url: String,
    /// The raw response body, or the status reason when the body was empty.
    pub message: String,
}

/// Unified error type for all transport-level failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The resource does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(HttpResponseError),

    /// Access to the resource was denied (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(HttpResponseError),

    /// A potentially temporary server-side failure (HTTP 502, 503, 504).
    #[error("Retryable server error: {0}")]
    Retryable(HttpResponseError),

    /// Any other non-2xx response.
    #[error(transparent)]
    Response(HttpResponseError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response whose body is not valid JSON.
    #[error("Invalid JSON body from {url}: {reason}")]
    InvalidBody {
        /// The URL that was requested.
        url: String,
        /// The decoding failure.
        reason: String,
    },
}

impl HttpError {
    /// Classifies a non-2xx response by status code.
    #[must_use]
    pub fn from_status(code: u16, url: impl Into<String>, message: impl Into<String>) -> Self {
        let error = HttpResponseError {
            code,
            url: url.into(),
            message: message.into(),
        };
        match code {
            404 => Self::NotFound(error),
            403 => Self::Forbidden(error),
            502..=504 => Self::Retryable(error),
            _ => Self::Response(error),
        }
    }

    /// Returns `true` if retrying the same request might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    /// Returns the HTTP status code, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(e) | Self::Forbidden(e) | Self::Retryable(e) | Self::Response(e) => {
                Some(e.code)
            }
            Self::Network(_) | Self::InvalidBody { .. } => None,
        }
    }
}
