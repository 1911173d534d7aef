//! Typed views over Deezer entities.
//!
//! Each view wraps an [`Entity`](crate::rest::Entity) of one kind,
//! dereferences to it for field access, and adds the relation helpers of
//! that kind.
//!
//! # Available Resources
//!
//! | View | Paginated relations | Eager relations | Writes |
//! |------|---------------------|-----------------|--------|
//! | [`Album`] | `tracks` | `artist` | |
//! | [`Artist`] | `top`, `related`, `albums`, `playlists` | `radio` | |
//! | [`Chart`] | `tracks`, `albums`, `artists`, `playlists`, `podcasts` | | |
//! | [`Editorial`] | `releases` | `selection`, `chart` | |
//! | [`Episode`] | | | `add_bookmark`, `remove_bookmark` |
//! | [`Genre`] | `podcasts` | `artists`, `radios` | |
//! | [`Playlist`] | `tracks`, `fans` | | `add_tracks`, `delete_tracks`, `reorder_tracks` |
//! | [`Podcast`] | `episodes` | | |
//! | [`Radio`] | | `tracks` | |
//! | [`Track`] | | `artist`, `album` | |
//! | [`User`] | `albums`, `tracks`, `artists`, `playlists`, `followers`, `followings` | | add/remove, `follow`, `create_playlist` |
//!
//! Paginated relations return a [`PaginatedList`](crate::rest::PaginatedList)
//! without making any request. Eager relations fetch and return a `Vec`.
//!
//! # Example
//!
//! ```rust,ignore
//! use deezer::rest::resources::Artist;
//!
//! let artist = client.get_artist(27).await?;
//! let mut top = artist.top()?;
//! let best = top.get(0).await?;
//! let album = best.album().await?;
//! ```

/// Declares a typed view over entities of one kind.
///
/// The view dereferences to [`Entity`], prints and serializes like it, and
/// implements [`Resource`].
macro_rules! resource_view {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name(crate::rest::entity::Entity);

        impl crate::rest::resource::Resource for $name {
            const KIND: crate::rest::registry::Kind = crate::rest::registry::Kind::$kind;

            fn wrap(entity: crate::rest::entity::Entity) -> Self {
                Self(entity)
            }

            fn entity(&self) -> &crate::rest::entity::Entity {
                &self.0
            }

            fn into_entity(self) -> crate::rest::entity::Entity {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::rest::entity::Entity;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&self.0, serializer)
            }
        }

        const _: fn() = || {
            const fn assert_send_sync<T: Send + Sync>() {}
            assert_send_sync::<$name>();
        };
    };
}

mod album;
mod artist;
mod chart;
mod editorial;
mod episode;
mod genre;
mod playlist;
mod podcast;
mod radio;
mod track;
mod user;

pub use crate::rest::resource::Resource;
pub use album::Album;
pub use artist::Artist;
pub use chart::Chart;
pub use editorial::Editorial;
pub use episode::Episode;
pub use genre::Genre;
pub use playlist::Playlist;
pub use podcast::Podcast;
pub use radio::Radio;
pub use track::Track;
pub use user::User;

use crate::rest::entity::{Entity, Identity};
use crate::rest::ResourceError;

/// Joins identities into the comma-separated list the API expects.
fn join_ids<I>(ids: I) -> String
where
    I: IntoIterator,
    I::Item: Into<Identity>,
{
    ids.into_iter()
        .map(|id| id.into().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Reads the entity referenced by `field` and returns its identity.
async fn linked_id(entity: &Entity, field: &str) -> Result<Identity, ResourceError> {
    entity
        .get_or_fetch(field)
        .await?
        .as_entity()
        .and_then(|linked| linked.id())
        .ok_or_else(|| ResourceError::missing(entity.kind(), field))
}
