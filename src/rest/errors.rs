//! Error types for the materialization and pagination engine.
//!
//! The engine never recovers from any of these locally. They map onto four
//! families:
//!
//! - **transport**: [`ResourceError::Http`], wrapping [`HttpError`]
//! - **functional**: [`ResourceError::ErrorResponse`], a 2xx body carrying an `error` field
//! - **unknown resource**: [`ResourceError::UnknownResource`], no tag and no hint
//! - **missing attribute**: [`ResourceError::MissingAttribute`], absent after lazy resolution
//!
//! plus the terminal state of a paginated sequence
//! ([`ResourceError::IndexOutOfRange`]) and malformed payloads.
//!
//! # Example
//!
//! ```rust,ignore
//! use deezer::rest::ResourceError;
//!
//! match album.get_or_fetch("label").await {
//!     Ok(label) => println!("{label:?}"),
//!     Err(ResourceError::MissingAttribute { kind, field }) => {
//!         println!("{kind} has no {field}");
//!     }
//!     Err(ResourceError::Http(e)) if e.is_retryable() => { /* retry later */ }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for engine operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A transport-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The API accepted the request but answered with an error envelope.
    ///
    /// The raw envelope is kept for inspection.
    #[error("Deezer returned an error: {body}")]
    ErrorResponse {
        /// The complete JSON body, including its `error` field.
        body: serde_json::Value,
    },

    /// Neither the type tag nor the caller's hint identify the record's shape.
    #[error("Unable to find resource type for {record}")]
    UnknownResource {
        /// The offending record, serialized as JSON.
        record: String,
    },

    /// The field does not exist for this entity, even after lazy resolution.
    #[error("'{kind}' entity has no attribute '{field}'")]
    MissingAttribute {
        /// The entity's kind tag.
        kind: String,
        /// The field that was requested.
        field: String,
    },

    /// A paginated sequence was exhausted before reaching the requested index.
    #[error("Index {index} out of range for a sequence of {available} elements")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// How many elements the remote collection actually holds.
        available: usize,
    },

    /// A payload could not be turned into an entity.
    #[error("Malformed record: {reason}")]
    MalformedRecord {
        /// What was wrong with the payload.
        reason: String,
    },

    /// A collection envelope carried a `next` URL that cannot be followed.
    #[error("Cannot follow next page URL '{url}'")]
    InvalidNextUrl {
        /// The URL found in the envelope.
        url: String,
    },

    /// The blocking facade could not start its runtime.
    #[error("Failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl ResourceError {
    /// Returns `true` if the underlying transport failure may succeed on retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_retryable())
    }

    /// Returns the functional error envelope, if this is one.
    #[must_use]
    pub const fn error_body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::ErrorResponse { body } => Some(body),
            _ => None,
        }
    }

    pub(crate) fn missing(kind: &str, field: &str) -> Self {
        Self::MissingAttribute {
            kind: kind.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }
}
