//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A Deezer user access token.
///
/// The token is forwarded as the `access_token` query parameter on every
/// request. Its value is masked in debug output to keep it out of logs.
///
/// # Example
///
/// ```rust
/// use deezer::AccessToken;
///
/// let token = AccessToken::new("frAbC123").unwrap();
/// assert_eq!(token.as_ref(), "frAbC123");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A Deezer application ID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppId(String);

impl AppId {
    /// Creates a new validated application ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAppId`] if the ID is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::EmptyAppId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A Deezer application secret, masked in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);

impl AppSecret {
    /// Creates a new validated application secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAppSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyAppSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for AppSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret(*****)")
    }
}

/// A validated API base URL.
///
/// The URL must be absolute and use the `http` or `https` scheme. Any
/// trailing slash is removed so paths can be joined with a single `/`.
///
/// # Example
///
/// ```rust
/// use deezer::BaseUrl;
///
/// let url = BaseUrl::new("https://api.deezer.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.deezer.com");
/// assert_eq!(url.host_name(), Some("api.deezer.com"));
///
/// assert!(BaseUrl::new("api.deezer.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    host: Option<String>,
}

impl BaseUrl {
    /// The public Deezer API endpoint.
    pub const DEFAULT: &'static str = "https://api.deezer.com";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is not an absolute
    /// http(s) URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/').to_string();

        let parsed = url::Url::parse(&trimmed)
            .map_err(|_| ConfigError::InvalidBaseUrl { url: url.clone() })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self {
            host: parsed.host_str().map(ToString::to_string),
            url: trimmed,
        })
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT.to_string(),
            host: Some("api.deezer.com".to_string()),
        }
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
