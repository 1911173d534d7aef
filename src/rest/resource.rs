//! The typed view trait.
//!
//! Every typed view ([`Album`](crate::rest::resources::Album),
//! [`Track`](crate::rest::resources::Track), ...) is a thin wrapper over an
//! [`Entity`] of one kind. The [`Resource`] trait gives them a uniform way to
//! be built from entities and fetched by identity.
//!
//! # Implementing Resource
//!
//! ```rust,ignore
//! use deezer::rest::{Entity, Kind, Resource};
//!
//! #[derive(Clone, Debug)]
//! pub struct Album(Entity);
//!
//! impl Resource for Album {
//!     const KIND: Kind = Kind::Album;
//!
//!     fn wrap(entity: Entity) -> Self {
//!         Self(entity)
//!     }
//!
//!     fn entity(&self) -> &Entity {
//!         &self.0
//!     }
//! }
//!
//! let album = Album::find(&client, 302127.into()).await?;
//! ```

use crate::clients::QueryParams;
use crate::rest::entity::{Entity, FromEntity, Identity};
use crate::rest::materializer::MaterializeOptions;
use crate::rest::path::entity_path;
use crate::rest::registry::Kind;
use crate::rest::{Client, ResourceError};
use crate::HttpMethod;

/// A typed view over entities of a single kind.
///
/// # Required Items
///
/// - `KIND`: The kind the view accepts
/// - [`wrap`](Resource::wrap): Builds the view without checking the kind
/// - [`entity`](Resource::entity): Returns the wrapped entity
#[allow(async_fn_in_trait)]
pub trait Resource: Clone + Send + Sync + Sized {
    /// The kind of entity this view wraps.
    const KIND: Kind;

    /// Wraps an entity without checking its kind.
    fn wrap(entity: Entity) -> Self;

    /// Returns the wrapped entity.
    fn entity(&self) -> &Entity;

    /// Returns the wrapped entity by value.
    #[must_use]
    fn into_entity(self) -> Entity {
        self.entity().clone()
    }

    /// Fetches the entity of this kind with the given identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer is a record of
    /// another kind.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let track = Track::find(&client, 3135556.into()).await?;
    /// ```
    async fn find(client: &Client, id: Identity) -> Result<Self, ResourceError> {
        client
            .request(
                HttpMethod::Get,
                &entity_path(Self::KIND.as_str(), &id),
                QueryParams::new(),
                MaterializeOptions::new().type_hint(Self::KIND),
            )
            .await?
            .into_typed()
    }
}

impl<T: Resource> FromEntity for T {
    fn from_entity(entity: Entity) -> Result<Self, ResourceError> {
        if entity.shape().kind == T::KIND {
            Ok(T::wrap(entity))
        } else {
            Err(ResourceError::malformed(format!(
                "expected a '{}' record, got '{}'",
                T::KIND,
                entity.kind()
            )))
        }
    }
}
