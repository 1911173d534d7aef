//! Genre view.

use crate::clients::QueryParams;
use crate::rest::pagination::PaginatedList;
use crate::rest::ResourceError;

use super::{Artist, Podcast, Radio};

resource_view! {
    /// A music genre.
    Genre => Genre
}

impl Genre {
    /// Fetches the artists of this genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn artists(&self) -> Result<Vec<Artist>, ResourceError> {
        self.artists_with(QueryParams::new()).await
    }

    /// Like [`artists`](Self::artists), with extra query parameters such as
    /// `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn artists_with(&self, params: QueryParams) -> Result<Vec<Artist>, ResourceError> {
        self.get_relation("artists", params, None)
            .await?
            .into_typed_list()
    }

    /// Fetches the radios of this genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn radios(&self) -> Result<Vec<Radio>, ResourceError> {
        self.radios_with(QueryParams::new()).await
    }

    /// Like [`radios`](Self::radios), with extra query parameters such as
    /// `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn radios_with(&self, params: QueryParams) -> Result<Vec<Radio>, ResourceError> {
        self.get_relation("radios", params, None)
            .await?
            .into_typed_list()
    }

    /// Returns the podcasts of this genre.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the genre has no id.
    pub fn podcasts(&self) -> Result<PaginatedList<Podcast>, ResourceError> {
        self.paginate("podcasts", QueryParams::new())
    }
}
