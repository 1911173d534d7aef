//! Album view.

use crate::clients::QueryParams;
use crate::rest::pagination::PaginatedList;
use crate::rest::resource::Resource;
use crate::rest::ResourceError;

use super::{linked_id, Artist, Track};

resource_view! {
    /// An album.
    ///
    /// Declared fields include `title`, `upc`, `cover_xl`, `genre_id`,
    /// `genres`, `label`, `nb_tracks`, `duration`, `fans`, `release_date`
    /// (a date), `record_type`, `explicit_lyrics`, `contributors` (artists),
    /// `artist` and `tracks`.
    Album => Album
}

impl Album {
    /// Fetches the full artist of this album.
    ///
    /// The embedded `artist` record is partial, so this always fetches it.
    ///
    /// # Errors
    ///
    /// Returns an error if the album has no artist or a request fails.
    pub async fn artist(&self) -> Result<Artist, ResourceError> {
        let artist_id = linked_id(self, "artist").await?;
        Artist::find(self.client(), artist_id).await
    }

    /// Returns the tracks of this album.
    ///
    /// Each track has this album as its `album` field.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the album has no id.
    pub fn tracks(&self) -> Result<PaginatedList<Track>, ResourceError> {
        self.paginate("tracks", QueryParams::new())
    }
}
