//! Editorial view.

use crate::clients::QueryParams;
use crate::rest::pagination::PaginatedList;
use crate::rest::registry::Kind;
use crate::rest::ResourceError;

use super::{Album, Chart};

resource_view! {
    /// An editorial: Deezer's curated selection for a genre.
    Editorial => Editorial
}

impl Editorial {
    /// Fetches the albums selected by Deezer's editors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn selection(&self) -> Result<Vec<Album>, ResourceError> {
        self.selection_with(QueryParams::new()).await
    }

    /// Like [`selection`](Self::selection), with extra query parameters such as
    /// `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn selection_with(&self, params: QueryParams) -> Result<Vec<Album>, ResourceError> {
        self.get_relation("selection", params, None)
            .await?
            .into_typed_list()
    }

    /// Fetches the chart of this editorial.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn chart(&self) -> Result<Chart, ResourceError> {
        self.chart_with(QueryParams::new()).await
    }

    /// Like [`chart`](Self::chart), with extra query parameters such as
    /// `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn chart_with(&self, params: QueryParams) -> Result<Chart, ResourceError> {
        self.get_relation("charts", params, Some(Kind::Chart))
            .await?
            .into_typed()
    }

    /// Returns the new releases of this editorial.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the editorial has no id.
    pub fn releases(&self) -> Result<PaginatedList<Album>, ResourceError> {
        self.paginate("releases", QueryParams::new())
    }
}
