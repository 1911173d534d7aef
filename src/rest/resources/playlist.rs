//! Playlist view.

use crate::clients::QueryParams;
use crate::rest::entity::Identity;
use crate::rest::pagination::PaginatedList;
use crate::rest::ResourceError;

use super::{join_ids, Track, User};

resource_view! {
    /// A playlist.
    Playlist => Playlist
}

impl Playlist {
    /// Returns the tracks of this playlist.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the playlist has no id.
    pub fn tracks(&self) -> Result<PaginatedList<Track>, ResourceError> {
        self.paginate("tracks", QueryParams::new())
    }

    /// Returns the users who added this playlist to their favorites.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the playlist has no id.
    pub fn fans(&self) -> Result<PaginatedList<User>, ResourceError> {
        self.paginate("fans", QueryParams::new())
    }

    /// Appends tracks to this playlist.
    ///
    /// Requires an authenticated client owning the playlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_tracks<I>(&self, tracks: I) -> Result<bool, ResourceError>
    where
        I: IntoIterator,
        I::Item: Into<Identity>,
    {
        let params = QueryParams::new().with("songs", join_ids(tracks));
        self.post_relation("tracks", params).await?.into_bool()
    }

    /// Removes tracks from this playlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_tracks<I>(&self, tracks: I) -> Result<bool, ResourceError>
    where
        I: IntoIterator,
        I::Item: Into<Identity>,
    {
        let params = QueryParams::new().with("songs", join_ids(tracks));
        self.delete_relation("tracks", params).await?.into_bool()
    }

    /// Reorders the tracks of this playlist.
    ///
    /// `order` lists every track of the playlist in its new position.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reorder_tracks<I>(&self, order: I) -> Result<bool, ResourceError>
    where
        I: IntoIterator,
        I::Item: Into<Identity>,
    {
        let params = QueryParams::new().with("order", join_ids(order));
        self.post_relation("tracks", params).await?.into_bool()
    }
}
