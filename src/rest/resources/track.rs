//! Track view.

use crate::rest::resource::Resource;
use crate::rest::ResourceError;

use super::{linked_id, Album, Artist};

resource_view! {
    /// A track.
    ///
    /// `release_date` is a date and `contributors` a list of artists.
    Track => Track
}

impl Track {
    /// Fetches the full artist of this track.
    ///
    /// # Errors
    ///
    /// Returns an error if the track has no artist or a request fails.
    pub async fn artist(&self) -> Result<Artist, ResourceError> {
        let artist_id = linked_id(self, "artist").await?;
        Artist::find(self.client(), artist_id).await
    }

    /// Fetches the full album of this track.
    ///
    /// # Errors
    ///
    /// Returns an error if the track has no album or a request fails.
    pub async fn album(&self) -> Result<Album, ResourceError> {
        let album_id = linked_id(self, "album").await?;
        Album::find(self.client(), album_id).await
    }
}
