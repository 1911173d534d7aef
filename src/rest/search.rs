//! Search query construction.
//!
//! Deezer's search takes a free-text `q` parameter. Advanced filters are
//! written inside the query as `key:"value"` terms, and two flags sit next to
//! it: `strict=on` disables fuzzy matching and `ordering` picks the ranking.
//!
//! # Example
//!
//! ```rust
//! use deezer::rest::{Search, SearchOrder};
//!
//! let search = Search::new("discovery")
//!     .artist("Daft Punk")
//!     .dur_min(120)
//!     .strict(true)
//!     .ordering(SearchOrder::RatingDesc);
//!
//! let params = search.to_params();
//! assert_eq!(params.get("q"), Some(r#"discovery artist:"Daft Punk" dur_min:"120""#));
//! assert_eq!(params.get("strict"), Some("on"));
//! assert_eq!(params.get("ordering"), Some("RATING_DESC"));
//! ```

use std::fmt;

use crate::clients::QueryParams;

/// Result ordering for a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchOrder {
    /// Most relevant first (the API default).
    Ranking,
    /// By track title, ascending.
    TrackAsc,
    /// By track title, descending.
    TrackDesc,
    /// By artist name, ascending.
    ArtistAsc,
    /// By artist name, descending.
    ArtistDesc,
    /// By album title, ascending.
    AlbumAsc,
    /// By album title, descending.
    AlbumDesc,
    /// By rating, ascending.
    RatingAsc,
    /// By rating, descending.
    RatingDesc,
    /// By duration, ascending.
    DurationAsc,
    /// By duration, descending.
    DurationDesc,
}

impl SearchOrder {
    /// Returns the value sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ranking => "RANKING",
            Self::TrackAsc => "TRACK_ASC",
            Self::TrackDesc => "TRACK_DESC",
            Self::ArtistAsc => "ARTIST_ASC",
            Self::ArtistDesc => "ARTIST_DESC",
            Self::AlbumAsc => "ALBUM_ASC",
            Self::AlbumDesc => "ALBUM_DESC",
            Self::RatingAsc => "RATING_ASC",
            Self::RatingDesc => "RATING_DESC",
            Self::DurationAsc => "DURATION_ASC",
            Self::DurationDesc => "DURATION_DESC",
        }
    }
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search query with optional advanced filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Search {
    query: String,
    strict: bool,
    ordering: Option<SearchOrder>,
    filters: Vec<(&'static str, String)>,
}

impl Search {
    /// Creates a search for free text. The text may be empty when only
    /// filters are used.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Disables fuzzy matching.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the result ordering.
    #[must_use]
    pub fn ordering(mut self, ordering: SearchOrder) -> Self {
        self.ordering = Some(ordering);
        self
    }

    fn filter(mut self, key: &'static str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.filters.push((key, value));
        }
        self
    }

    /// Filters on artist name.
    #[must_use]
    pub fn artist(self, artist: impl Into<String>) -> Self {
        self.filter("artist", artist.into())
    }

    /// Filters on album title.
    #[must_use]
    pub fn album(self, album: impl Into<String>) -> Self {
        self.filter("album", album.into())
    }

    /// Filters on track title.
    #[must_use]
    pub fn track(self, track: impl Into<String>) -> Self {
        self.filter("track", track.into())
    }

    /// Filters on label name.
    #[must_use]
    pub fn label(self, label: impl Into<String>) -> Self {
        self.filter("label", label.into())
    }

    /// Minimum duration in seconds.
    #[must_use]
    pub fn dur_min(self, seconds: u32) -> Self {
        self.filter("dur_min", seconds)
    }

    /// Maximum duration in seconds.
    #[must_use]
    pub fn dur_max(self, seconds: u32) -> Self {
        self.filter("dur_max", seconds)
    }

    /// Minimum beats per minute.
    #[must_use]
    pub fn bpm_min(self, bpm: u32) -> Self {
        self.filter("bpm_min", bpm)
    }

    /// Maximum beats per minute.
    #[must_use]
    pub fn bpm_max(self, bpm: u32) -> Self {
        self.filter("bpm_max", bpm)
    }

    /// Builds the query parameters for the search endpoints.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut parts: Vec<String> = Vec::with_capacity(self.filters.len() + 1);
        if !self.query.is_empty() {
            parts.push(self.query.clone());
        }
        parts.extend(
            self.filters
                .iter()
                .map(|(key, value)| format!("{key}:\"{value}\"")),
        );

        let mut params = QueryParams::new();
        params.set("q", parts.join(" "));
        if self.strict {
            params.set("strict", "on");
        }
        if let Some(ordering) = self.ordering {
            params.set("ordering", ordering);
        }
        params
    }
}

impl From<&str> for Search {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}
