//! Radio view.

use crate::clients::QueryParams;
use crate::rest::ResourceError;

use super::Track;

resource_view! {
    /// A radio (a flow of tracks).
    Radio => Radio
}

impl Radio {
    /// Fetches the first tracks of this radio.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn tracks(&self) -> Result<Vec<Track>, ResourceError> {
        self.tracks_with(QueryParams::new()).await
    }

    /// Like [`tracks`](Self::tracks), with extra query parameters such as
    /// `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn tracks_with(&self, params: QueryParams) -> Result<Vec<Track>, ResourceError> {
        self.get_relation("tracks", params, None)
            .await?
            .into_typed_list()
    }
}
