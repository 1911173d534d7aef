//! Configuration types for the Deezer client.
//!
//! This module provides the configuration used to build a
//! [`Client`](crate::Client) and its underlying HTTP transport.
//!
//! # Overview
//!
//! - [`ClientConfig`]: The configuration struct holding all client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`AccessToken`]: A user access token, masked in debug output
//! - [`AppId`] / [`AppSecret`]: Application credentials
//! - [`BaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use deezer::{ClientConfig, AccessToken};
//!
//! let config = ClientConfig::builder()
//!     .access_token(AccessToken::new("user-token").unwrap())
//!     .header("Accept-Language", "fr")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.deezer.com");
//! ```

mod newtypes;

pub use newtypes::{AccessToken, AppId, AppSecret, BaseUrl};

use std::collections::HashMap;

use crate::error::ConfigError;

/// Configuration for the Deezer client.
///
/// All fields are optional: the default configuration talks anonymously to
/// the public API.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    base_url: BaseUrl,
    access_token: Option<AccessToken>,
    app_id: Option<AppId>,
    app_secret: Option<AppSecret>,
    headers: HashMap<String, String>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the access token, if configured.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Returns the application ID, if configured.
    #[must_use]
    pub const fn app_id(&self) -> Option<&AppId> {
        self.app_id.as_ref()
    }

    /// Returns the application secret, if configured.
    #[must_use]
    pub const fn app_secret(&self) -> Option<&AppSecret> {
        self.app_secret.as_ref()
    }

    /// Returns the custom headers sent with every request.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `base_url`: `https://api.deezer.com`
/// - `access_token`, `app_id`, `app_secret`: `None`
/// - `headers`: empty
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    access_token: Option<AccessToken>,
    app_id: Option<AppId>,
    app_secret: Option<AppSecret>,
    headers: HashMap<String, String>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the API base URL (useful for proxies and tests).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the user access token.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the application ID.
    #[must_use]
    pub fn app_id(mut self, id: AppId) -> Self {
        self.app_id = Some(id);
        self
    }

    /// Sets the application secret.
    #[must_use]
    pub fn app_secret(mut self, secret: AppSecret) -> Self {
        self.app_secret = Some(secret);
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Use `Accept-Language` to force the language of localized fields.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replaces all custom headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if a custom header name or
    /// value cannot be sent over HTTP.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        for (name, value) in &self.headers {
            reqwest::header::HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            reqwest::header::HeaderValue::from_str(value).map_err(|e| {
                ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(ClientConfig {
            base_url: self.base_url.unwrap_or_default(),
            access_token: self.access_token,
            app_id: self.app_id,
            app_secret: self.app_secret,
            headers: self.headers,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
