//! Error types for client configuration.
//!
//! This module contains the error type returned when building a
//! [`ClientConfig`](crate::ClientConfig) or one of its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use deezer::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Omit it instead of passing an empty string.")]
    EmptyAccessToken,

    /// Application ID cannot be empty.
    #[error("Application ID cannot be empty. Please provide a valid Deezer application ID.")]
    EmptyAppId,

    /// Application secret cannot be empty.
    #[error("Application secret cannot be empty. Please provide a valid Deezer application secret.")]
    EmptyAppSecret,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an absolute http(s) URL (e.g., 'https://api.deezer.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A header name or value cannot be sent over HTTP.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },
}
