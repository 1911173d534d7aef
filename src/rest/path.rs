//! Path building for entities, relations and pagination cursors.
//!
//! Deezer addresses everything through a small set of templates:
//!
//! - `{kind}/{id}`: a single entity
//! - `{kind}/{id}/{relation}`: a sub-collection or relation of an entity
//!
//! Collection envelopes also carry an absolute `next` URL; [`PageRequest`]
//! turns it back into a relative path plus query parameters so the next page
//! goes through the same transport as everything else.
//!
//! # Example
//!
//! ```rust
//! use deezer::rest::{build_path, PageRequest};
//! use std::collections::HashMap;
//!
//! let mut ids = HashMap::new();
//! ids.insert("user_id", "me");
//! assert_eq!(build_path("user/{user_id}/flow", &ids), "user/me/flow");
//!
//! let next = PageRequest::from_next_url("https://api.deezer.com/album/302127/tracks?index=25&limit=25")
//!     .unwrap();
//! assert_eq!(next.path, "album/302127/tracks");
//! assert_eq!(next.params.get("index"), Some("25"));
//! ```

use std::collections::HashMap;
use std::fmt::Display;

use url::Url;

use crate::clients::QueryParams;
use crate::rest::ResourceError;

/// Template for a single entity.
pub const ENTITY_TEMPLATE: &str = "{kind}/{id}";

/// Template for an entity relation.
pub const RELATION_TEMPLATE: &str = "{kind}/{id}/{relation}";

/// Builds a URL from a template by interpolating IDs.
///
/// Replaces `{name}` placeholders in the template with values from the
/// provided map. Unknown placeholders are left untouched.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn build_path<V: Display>(template: &str, ids: &HashMap<&str, V>) -> String {
    let mut result = template.to_string();

    for (key, value) in ids {
        let placeholder = format!("{{{key}}}");
        result = result.replace(&placeholder, &value.to_string());
    }

    result
}

/// Returns the path of a single entity.
#[must_use]
pub fn entity_path(kind: &str, id: impl Display) -> String {
    let mut ids: HashMap<&str, String> = HashMap::new();
    ids.insert("kind", kind.to_string());
    ids.insert("id", id.to_string());
    build_path(ENTITY_TEMPLATE, &ids)
}

/// Returns the path of a relation of an entity.
#[must_use]
pub fn relation_path(kind: &str, id: impl Display, relation: &str) -> String {
    let mut ids: HashMap<&str, String> = HashMap::new();
    ids.insert("kind", kind.to_string());
    ids.insert("id", id.to_string());
    ids.insert("relation", relation.to_string());
    build_path(RELATION_TEMPLATE, &ids)
}

/// The request that fetches one page of a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// Path relative to the API base URL.
    pub path: String,
    /// Query parameters, including the pagination window.
    pub params: QueryParams,
}

impl PageRequest {
    /// Creates a page request for a relative path.
    #[must_use]
    pub fn new(path: impl Into<String>, params: QueryParams) -> Self {
        Self {
            path: path.into().trim_start_matches('/').to_string(),
            params,
        }
    }

    /// Parses the absolute `next` URL found in a collection envelope.
    ///
    /// The scheme and host are discarded: the path is resolved against the
    /// configured base URL when the request is sent. Repeated keys are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidNextUrl`] if `next` is not an absolute
    /// URL.
    pub fn from_next_url(next: &str) -> Result<Self, ResourceError> {
        let url = Url::parse(next).map_err(|_| ResourceError::InvalidNextUrl {
            url: next.to_string(),
        })?;

        let params = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self::new(url.path(), params))
    }
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PageRequest>();
};
