//! The type registry: wire tag to entity shape.
//!
//! Every JSON record the API returns may carry a short `type` tag
//! (`"album"`, `"track"`, ...). The registry maps that tag to a [`Shape`],
//! which tells the materializer which fields the kind declares, how to parse
//! some of them, and which missing fields can be derived without I/O.
//!
//! Unknown tags never fail: they resolve to the generic shape so that new
//! kinds introduced by the API do not break the client.
//!
//! # Example
//!
//! ```rust
//! use deezer::rest::{Kind, TypeRegistry};
//!
//! let registry = TypeRegistry::default();
//! assert_eq!(registry.lookup("album").map(|s| s.kind), Some(Kind::Album));
//! assert!(registry.lookup("hologram").is_none());
//! assert_eq!(registry.resolve("hologram").kind, Kind::Generic);
//! ```

use std::fmt;
use std::str::FromStr;

/// The entity kinds known to the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// An album.
    Album,
    /// An artist.
    Artist,
    /// Aggregated charts for a genre (no tag on the wire).
    Chart,
    /// An editorial page.
    Editorial,
    /// A podcast episode.
    Episode,
    /// A music genre.
    Genre,
    /// A playlist.
    Playlist,
    /// A podcast.
    Podcast,
    /// A radio (mix).
    Radio,
    /// A track.
    Track,
    /// A user profile.
    User,
    /// Any tag the registry does not know.
    Generic,
}

impl Kind {
    /// Returns the wire tag for this kind.
    ///
    /// The generic kind has no tag of its own and reports `"resource"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Chart => "chart",
            Self::Editorial => "editorial",
            Self::Episode => "episode",
            Self::Genre => "genre",
            Self::Playlist => "playlist",
            Self::Podcast => "podcast",
            Self::Radio => "radio",
            Self::Track => "track",
            Self::User => "user",
            Self::Generic => "resource",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ();

    /// Parses a registered wire tag. Unknown tags are an error here; use
    /// [`TypeRegistry::resolve`] for the forgiving lookup.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        TypeRegistry::default()
            .lookup(tag)
            .map(|shape| shape.kind)
            .ok_or(())
    }
}

/// Conversion applied to a raw field value while an entity is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldParser {
    /// `YYYY-MM-DD`; `0000-00-00` and empty strings become null.
    Date,
    /// `YYYY-MM-DD HH:MM:SS`; same null rule as [`FieldParser::Date`].
    DateTime,
    /// A plain array of artist records, each materialized as an artist.
    ArtistList,
}

/// A field value computed from already-known fields, with no I/O.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Derivation {
    /// `https://www.deezer.com/{kind}/{id}`.
    CanonicalLink,
    /// `{link}?utm_source=deezer&utm_content={kind}-{id}&utm_medium=web`.
    ShareLink,
}

/// The constructor and behavior bundle registered for a wire tag.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    /// The kind this shape builds.
    pub kind: Kind,
    /// Fields the API documents for this kind.
    ///
    /// Reading an undeclared, absent field fails without I/O. The generic
    /// shape declares nothing and accepts everything.
    pub fields: &'static [&'static str],
    /// Parsers applied to raw values at construction.
    pub parsers: &'static [(&'static str, FieldParser)],
    /// Fields that can be computed from the identity.
    pub derivations: &'static [(&'static str, Derivation)],
}

impl Shape {
    /// Returns `true` if `field` may exist on entities of this shape.
    #[must_use]
    pub fn declares(&self, field: &str) -> bool {
        self.kind == Kind::Generic || self.fields.contains(&field)
    }

    /// Returns the parser registered for `field`, if any.
    #[must_use]
    pub fn parser_for(&self, field: &str) -> Option<FieldParser> {
        self.parsers
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, parser)| *parser)
    }

    /// Returns the derivation rule registered for `field`, if any.
    #[must_use]
    pub fn derivation_for(&self, field: &str) -> Option<Derivation> {
        self.derivations
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rule)| *rule)
    }
}

const LINK: &[(&str, Derivation)] = &[("link", Derivation::CanonicalLink)];

/// Album shape.
pub static ALBUM: Shape = Shape {
    kind: Kind::Album,
    fields: &[
        "id", "type", "title", "upc", "link", "share", "cover", "cover_small", "cover_medium",
        "cover_big", "cover_xl", "md5_image", "genre_id", "genres", "label", "nb_tracks",
        "duration", "fans", "release_date", "record_type", "available", "alternative",
        "tracklist", "explicit_lyrics", "explicit_content_lyrics", "explicit_content_cover",
        "contributors", "artist", "tracks",
    ],
    parsers: &[
        ("release_date", FieldParser::Date),
        ("contributors", FieldParser::ArtistList),
    ],
    derivations: LINK,
};

/// Artist shape.
pub static ARTIST: Shape = Shape {
    kind: Kind::Artist,
    fields: &[
        "id", "type", "name", "link", "share", "picture", "picture_small", "picture_medium",
        "picture_big", "picture_xl", "nb_album", "nb_fan", "radio", "tracklist",
    ],
    parsers: &[],
    derivations: LINK,
};

/// Chart shape.
pub static CHART: Shape = Shape {
    kind: Kind::Chart,
    fields: &["id", "type", "tracks", "albums", "artists", "playlists", "podcasts"],
    parsers: &[],
    derivations: &[],
};

/// Editorial shape.
pub static EDITORIAL: Shape = Shape {
    kind: Kind::Editorial,
    fields: &[
        "id", "type", "name", "picture", "picture_small", "picture_medium", "picture_big",
        "picture_xl",
    ],
    parsers: &[],
    derivations: &[],
};

/// Episode shape.
pub static EPISODE: Shape = Shape {
    kind: Kind::Episode,
    fields: &[
        "id", "type", "title", "description", "available", "release_date", "duration", "link",
        "share", "picture", "picture_small", "picture_medium", "picture_big", "picture_xl",
        "podcast",
    ],
    parsers: &[("release_date", FieldParser::DateTime)],
    derivations: &[
        ("link", Derivation::CanonicalLink),
        ("share", Derivation::ShareLink),
    ],
};

/// Genre shape.
pub static GENRE: Shape = Shape {
    kind: Kind::Genre,
    fields: &[
        "id", "type", "name", "picture", "picture_small", "picture_medium", "picture_big",
        "picture_xl",
    ],
    parsers: &[],
    derivations: &[],
};

/// Playlist shape.
pub static PLAYLIST: Shape = Shape {
    kind: Kind::Playlist,
    fields: &[
        "id", "type", "title", "description", "duration", "public", "is_loved_track",
        "collaborative", "nb_tracks", "unseen_track_count", "fans", "link", "share", "picture",
        "picture_small", "picture_medium", "picture_big", "picture_xl", "checksum", "creator",
        "tracks",
    ],
    parsers: &[],
    derivations: LINK,
};

/// Podcast shape.
pub static PODCAST: Shape = Shape {
    kind: Kind::Podcast,
    fields: &[
        "id", "type", "title", "description", "available", "fans", "link", "share", "picture",
        "picture_small", "picture_medium", "picture_big", "picture_xl",
    ],
    parsers: &[],
    derivations: LINK,
};

/// Radio shape.
pub static RADIO: Shape = Shape {
    kind: Kind::Radio,
    fields: &[
        "id", "type", "title", "description", "share", "picture", "picture_small",
        "picture_medium", "picture_big", "picture_xl", "tracklist", "md5_image",
    ],
    parsers: &[],
    derivations: &[],
};

/// Track shape.
pub static TRACK: Shape = Shape {
    kind: Kind::Track,
    fields: &[
        "id", "type", "readable", "title", "title_short", "title_version", "unseen", "isrc",
        "link", "share", "duration", "track_position", "disk_number", "rank", "release_date",
        "explicit_lyrics", "explicit_content_lyrics", "explicit_content_cover", "preview", "bpm",
        "gain", "available_countries", "alternative", "contributors", "md5_image", "artist",
        "album",
    ],
    parsers: &[
        ("release_date", FieldParser::Date),
        ("contributors", FieldParser::ArtistList),
    ],
    derivations: LINK,
};

/// User shape.
pub static USER: Shape = Shape {
    kind: Kind::User,
    fields: &[
        "id", "type", "name", "lastname", "firstname", "email", "status", "birthday",
        "inscription_date", "gender", "link", "picture", "picture_small", "picture_medium",
        "picture_big", "picture_xl", "country", "lang", "is_kid", "explicit_content_level",
        "explicit_content_levels_available", "tracklist",
    ],
    parsers: &[
        ("birthday", FieldParser::Date),
        ("inscription_date", FieldParser::Date),
    ],
    derivations: LINK,
};

/// Fallback shape for unregistered tags.
pub static GENERIC: Shape = Shape {
    kind: Kind::Generic,
    fields: &[],
    parsers: &[],
    derivations: LINK,
};

static DEEZER_SHAPES: &[(&str, &Shape)] = &[
    ("album", &ALBUM),
    ("artist", &ARTIST),
    ("chart", &CHART),
    ("editorial", &EDITORIAL),
    ("episode", &EPISODE),
    ("genre", &GENRE),
    ("playlist", &PLAYLIST),
    ("podcast", &PODCAST),
    ("radio", &RADIO),
    ("track", &TRACK),
    ("user", &USER),
];

/// Static mapping from wire tag to [`Shape`].
///
/// The registry is a fixed table: it holds no state and lookups have no
/// side effects.
#[derive(Clone, Copy, Debug)]
pub struct TypeRegistry {
    shapes: &'static [(&'static str, &'static Shape)],
}

impl TypeRegistry {
    /// Creates a registry over a custom table.
    #[must_use]
    pub const fn new(shapes: &'static [(&'static str, &'static Shape)]) -> Self {
        Self { shapes }
    }

    /// Returns the shape registered for `tag`.
    #[must_use]
    pub fn lookup(&self, tag: &str) -> Option<&'static Shape> {
        self.shapes
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, shape)| *shape)
    }

    /// Returns the shape for `tag`, falling back to the generic shape.
    #[must_use]
    pub fn resolve(&self, tag: &str) -> &'static Shape {
        self.lookup(tag).unwrap_or(&GENERIC)
    }

    /// Returns the shape for a kind, whether or not it is in this table.
    #[must_use]
    pub const fn shape(&self, kind: Kind) -> &'static Shape {
        match kind {
            Kind::Album => &ALBUM,
            Kind::Artist => &ARTIST,
            Kind::Chart => &CHART,
            Kind::Editorial => &EDITORIAL,
            Kind::Episode => &EPISODE,
            Kind::Genre => &GENRE,
            Kind::Playlist => &PLAYLIST,
            Kind::Podcast => &PODCAST,
            Kind::Radio => &RADIO,
            Kind::Track => &TRACK,
            Kind::User => &USER,
            Kind::Generic => &GENERIC,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(DEEZER_SHAPES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registered_tag_round_trips_through_kind() {
        let registry = TypeRegistry::default();
        for (tag, shape) in DEEZER_SHAPES {
            assert_eq!(shape.kind.as_str(), *tag);
            assert_eq!(registry.lookup(tag), Some(*shape));
            assert_eq!(registry.shape(shape.kind), *shape);
        }
    }

    #[test]
    fn test_unknown_tag_resolves_to_generic() {
        let registry = TypeRegistry::default();
        assert!(registry.lookup("unheard-of").is_none());
        assert_eq!(registry.resolve("unheard-of").kind, Kind::Generic);
    }

    #[test]
    fn test_generic_shape_declares_everything() {
        assert!(GENERIC.declares("anything"));
        assert!(ALBUM.declares("label"));
        assert!(!ALBUM.declares("bpm"));
    }

    #[test]
    fn test_parsers_and_derivations_lookup() {
        assert_eq!(ALBUM.parser_for("release_date"), Some(FieldParser::Date));
        assert_eq!(EPISODE.parser_for("release_date"), Some(FieldParser::DateTime));
        assert_eq!(TRACK.parser_for("title"), None);
        assert_eq!(EPISODE.derivation_for("share"), Some(Derivation::ShareLink));
        assert_eq!(ARTIST.derivation_for("share"), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("track".parse::<Kind>(), Ok(Kind::Track));
        assert!("folder".parse::<Kind>().is_err());
        assert_eq!(Kind::Generic.to_string(), "resource");
    }

    #[test]
    fn test_custom_registry_table() {
        static ONLY_ALBUMS: &[(&str, &Shape)] = &[("album", &ALBUM)];
        let registry = TypeRegistry::new(ONLY_ALBUMS);
        assert!(registry.lookup("track").is_none());
        assert_eq!(registry.resolve("track").kind, Kind::Generic);
    }
}
