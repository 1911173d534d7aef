//! Chart view.
//!
//! Chart records carry no `type` tag and no `id`; the client gives them the
//! genre id they were requested with, `0` for the global chart.

use crate::clients::QueryParams;
use crate::rest::pagination::PaginatedList;
use crate::rest::ResourceError;

use super::{Album, Artist, Playlist, Podcast, Track};

resource_view! {
    /// Top tracks, albums, artists, playlists and podcasts of a genre.
    Chart => Chart
}

impl Chart {
    /// Returns the top tracks of this chart.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the chart has no id.
    pub fn tracks(&self) -> Result<PaginatedList<Track>, ResourceError> {
        self.paginate("tracks", QueryParams::new())
    }

    /// Returns the top albums of this chart.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the chart has no id.
    pub fn albums(&self) -> Result<PaginatedList<Album>, ResourceError> {
        self.paginate("albums", QueryParams::new())
    }

    /// Returns the top artists of this chart.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the chart has no id.
    pub fn artists(&self) -> Result<PaginatedList<Artist>, ResourceError> {
        self.paginate("artists", QueryParams::new())
    }

    /// Returns the top playlists of this chart.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the chart has no id.
    pub fn playlists(&self) -> Result<PaginatedList<Playlist>, ResourceError> {
        self.paginate("playlists", QueryParams::new())
    }

    /// Returns the top podcasts of this chart.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] if the chart has no id.
    pub fn podcasts(&self) -> Result<PaginatedList<Podcast>, ResourceError> {
        self.paginate("podcasts", QueryParams::new())
    }
}
