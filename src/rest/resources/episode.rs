//! Episode view.

use crate::clients::QueryParams;
use crate::rest::ResourceError;

resource_view! {
    /// A podcast episode.
    ///
    /// `release_date` is a date-time. `link` and `share` are derived from the
    /// id when the record does not carry them.
    Episode => Episode
}

impl Episode {
    /// Sets a bookmark on this episode, `offset` being a percentage of the
    /// episode's duration.
    ///
    /// Requires an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_bookmark(&self, offset: u8) -> Result<bool, ResourceError> {
        let params = QueryParams::new().with("offset", offset);
        self.post_relation("bookmark", params).await?.into_bool()
    }

    /// Removes the bookmark on this episode.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_bookmark(&self) -> Result<bool, ResourceError> {
        self.delete_relation("bookmark", QueryParams::new())
            .await?
            .into_bool()
    }
}
