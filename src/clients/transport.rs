//! The transport seam between the engine and the network.
//!
//! The materialization and pagination engine never talks to HTTP directly.
//! It issues every request through a [`Transport`], which makes it possible
//! to drive the whole engine from an in-memory fake in tests.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::clients::{HttpError, HttpRequest, HttpResponse};

/// Sends requests to the Deezer API.
///
/// Implementations must:
/// - return `Ok` only for 2xx responses, with the body already decoded
/// - classify non-2xx statuses with [`HttpError::from_status`]
/// - add credentials and custom headers themselves (the engine is unaware of them)
///
/// Each call is a single suspension point. Dropping the returned future
/// cancels the call; the engine applies no state change until it resolves.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Sends one request and returns the decoded response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}
