//! User view.
//!
//! Reading relations works for any public user. Writes require an
//! authenticated client acting as this user.

use crate::clients::QueryParams;
use crate::rest::entity::Identity;
use crate::rest::materializer::MaterializeOptions;
use crate::rest::pagination::PaginatedList;
use crate::rest::path::relation_path;
use crate::rest::registry::Kind;
use crate::rest::resource::Resource;
use crate::rest::ResourceError;
use crate::HttpMethod;

use super::{Album, Artist, Playlist, Track};

resource_view! {
    /// A Deezer user.
    ///
    /// `birthday` and `inscription_date` are dates.
    User => User
}

fn id_param(key: &str, id: impl Into<Identity>) -> QueryParams {
    let id: Identity = id.into();
    QueryParams::new().with(key, id)
}

impl User {
    async fn write(&self, add: bool, relation: &str, params: QueryParams) -> Result<bool, ResourceError> {
        let answer = if add {
            self.post_relation(relation, params).await?
        } else {
            self.delete_relation(relation, params).await?
        };
        answer.into_bool()
    }

    /// Returns the favorite albums of this user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the user has no id.
    pub fn albums(&self) -> Result<PaginatedList<Album>, ResourceError> {
        self.paginate("albums", QueryParams::new())
    }

    /// Adds an album to this user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_album(&self, album_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(true, "albums", id_param("album_id", album_id)).await
    }

    /// Removes an album from this user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_album(&self, album_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(false, "albums", id_param("album_id", album_id)).await
    }

    /// Returns the favorite tracks of this user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the user has no id.
    pub fn tracks(&self) -> Result<PaginatedList<Track>, ResourceError> {
        self.paginate("tracks", QueryParams::new())
    }

    /// Adds a track to this user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_track(&self, track_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(true, "tracks", id_param("track_id", track_id)).await
    }

    /// Removes a track from this user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_track(&self, track_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(false, "tracks", id_param("track_id", track_id)).await
    }

    /// Returns the favorite artists of this user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the user has no id.
    pub fn artists(&self) -> Result<PaginatedList<Artist>, ResourceError> {
        self.paginate("artists", QueryParams::new())
    }

    /// Adds an artist to this user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_artist(&self, artist_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(true, "artists", id_param("artist_id", artist_id)).await
    }

    /// Removes an artist from this user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_artist(&self, artist_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(false, "artists", id_param("artist_id", artist_id)).await
    }

    /// Returns the users following this user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the user has no id.
    pub fn followers(&self) -> Result<PaginatedList<Self>, ResourceError> {
        self.paginate("followers", QueryParams::new())
    }

    /// Returns the users this user follows.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the user has no id.
    pub fn followings(&self) -> Result<PaginatedList<Self>, ResourceError> {
        self.paginate("followings", QueryParams::new())
    }

    /// Follows another user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn follow(&self, user_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(true, "followings", id_param("user_id", user_id)).await
    }

    /// Stops following another user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unfollow(&self, user_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(false, "followings", id_param("user_id", user_id)).await
    }

    /// Returns the playlists of this user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the user has no id.
    pub fn playlists(&self) -> Result<PaginatedList<Playlist>, ResourceError> {
        self.paginate("playlists", QueryParams::new())
    }

    /// Adds a playlist to this user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_playlist(&self, playlist_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        self.write(true, "playlists", id_param("playlist_id", playlist_id)).await
    }

    /// Removes a playlist from this user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_playlist(
        &self,
        playlist_id: impl Into<Identity>,
    ) -> Result<bool, ResourceError> {
        self.write(false, "playlists", id_param("playlist_id", playlist_id)).await
    }

    /// Creates a playlist owned by this user and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer has no id.
    pub async fn create_playlist(&self, title: &str) -> Result<Identity, ResourceError> {
        let params = QueryParams::new().with("title", title);
        let created = self
            .client()
            .request(
                HttpMethod::Post,
                &relation_path(self.kind(), self.require_identity()?, "playlists"),
                params,
                MaterializeOptions::new().type_hint(Kind::Playlist),
            )
            .await?
            .into_entity()?;
        created
            .id()
            .ok_or_else(|| ResourceError::missing(created.kind(), "id"))
    }

    fn require_identity(&self) -> Result<Identity, ResourceError> {
        self.id().ok_or_else(|| ResourceError::missing(Self::KIND.as_str(), "id"))
    }
}
