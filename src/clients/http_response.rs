//! HTTP response types for the Deezer client.

use std::collections::HashMap;

/// A decoded response from the Deezer API.
///
/// Transports only hand successful (2xx) responses to the engine; failures
/// are reported as [`HttpError`](crate::clients::HttpError) instead.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded JSON body (`null` when the body was empty).
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Creates a `200 OK` response with no headers.
    #[must_use]
    pub fn ok(body: serde_json::Value) -> Self {
        Self::new(200, HashMap::new(), body)
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
