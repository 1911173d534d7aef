//! Artist view.

use crate::clients::QueryParams;
use crate::rest::pagination::PaginatedList;
use crate::rest::ResourceError;

use super::{Album, Playlist, Track};

resource_view! {
    /// An artist.
    Artist => Artist
}

impl Artist {
    /// Returns the top tracks of this artist.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the artist has no id.
    pub fn top(&self) -> Result<PaginatedList<Track>, ResourceError> {
        self.paginate("top", QueryParams::new())
    }

    /// Returns artists similar to this one.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the artist has no id.
    pub fn related(&self) -> Result<PaginatedList<Self>, ResourceError> {
        self.paginate("related", QueryParams::new())
    }

    /// Fetches a radio mix of tracks based on this artist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn radio(&self) -> Result<Vec<Track>, ResourceError> {
        self.radio_with(QueryParams::new()).await
    }

    /// Like [`radio`](Self::radio), with extra query parameters such as
    /// `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn radio_with(&self, params: QueryParams) -> Result<Vec<Track>, ResourceError> {
        self.get_relation("radio", params, None)
            .await?
            .into_typed_list()
    }

    /// Returns the albums of this artist.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the artist has no id.
    pub fn albums(&self) -> Result<PaginatedList<Album>, ResourceError> {
        self.paginate("albums", QueryParams::new())
    }

    /// Returns the playlists featuring this artist.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the artist has no id.
    pub fn playlists(&self) -> Result<PaginatedList<Playlist>, ResourceError> {
        self.paginate("playlists", QueryParams::new())
    }
}
