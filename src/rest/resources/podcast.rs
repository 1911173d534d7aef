//! Podcast view.

use crate::clients::QueryParams;
use crate::rest::pagination::PaginatedList;
use crate::rest::ResourceError;

use super::Episode;

resource_view! {
    /// A podcast.
    Podcast => Podcast
}

impl Podcast {
    /// Returns the episodes of this podcast.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the podcast has no id.
    pub fn episodes(&self) -> Result<PaginatedList<Episode>, ResourceError> {
        self.paginate("episodes", QueryParams::new())
    }
}
