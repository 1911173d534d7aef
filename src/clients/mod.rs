//! HTTP transport types for Deezer API communication.
//!
//! This module provides the transport layer the engine is built on. It
//! handles request construction, credentials, custom headers and status
//! classification, and nothing else: materialization and pagination live in
//! [`rest`](crate::rest).
//!
//! # Overview
//!
//! - [`Transport`]: The seam the engine sends every request through
//! - [`HttpClient`]: The reqwest-backed [`Transport`]
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A decoded 2xx response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, DELETE)
//! - [`QueryParams`]: Ordered query parameters
//! - [`HttpError`]: Transport error taxonomy (not found, forbidden, retryable, generic)
//!
//! # Retry Behavior
//!
//! The client never retries. [`HttpError::is_retryable`] reports whether a
//! failure belongs to the 502/503/504 class so callers can decide.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{HttpError, HttpResponseError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, QueryParams};
pub use http_response::HttpResponse;
pub use transport::Transport;
