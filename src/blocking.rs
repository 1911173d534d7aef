//! A blocking facade over the async engine.
//!
//! [`Client`] owns a current-thread tokio runtime and drives the async
//! [`rest::Client`](crate::rest::Client) on it. Entities, typed views and
//! sequences are the very same objects the async client produces, so their
//! identity, buffering and lazy-loading behavior is shared.
//!
//! The facade must not be used from within an async context: blocking on
//! its runtime from inside another runtime panics.
//!
//! # Example
//!
//! ```rust,ignore
//! use deezer::blocking::Client;
//! use deezer::ClientConfig;
//!
//! let client = Client::new(&ClientConfig::default())?;
//! let album = client.get_album(302127)?;
//!
//! for track in client.sequence(album.tracks()?).iter() {
//!     println!("{}", track?);
//! }
//!
//! // Relations and lazy fields block through the same runtime.
//! let artist = client.block_on(album.artist())?;
//! let fans = client.get_or_fetch(&artist, "nb_fan")?;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::config::ClientConfig;
use crate::rest::resources::{
    Album, Artist, Chart, Editorial, Episode, Genre, Playlist, Podcast, Radio, Track, User,
};
use crate::rest::{self, Entity, Field, FromEntity, Identity, ResourceError, Search};

/// Declares blocking mirrors of async client methods.
macro_rules! blocking {
    ($( $(#[$meta:meta])* fn $name:ident($($arg:ident: $ty:ty),*) -> $out:ty; )*) => {
        $(
            $(#[$meta])*
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the answer cannot be
            /// materialized.
            pub fn $name(&self, $($arg: $ty),*) -> Result<$out, ResourceError> {
                self.block_on(self.inner.$name($($arg),*))
            }
        )*
    };
}

/// Declares blocking mirrors of async client methods returning sequences.
macro_rules! sequences {
    ($( $(#[$meta:meta])* fn $name:ident($($arg:ident: $ty:ty),*) -> $item:ty; )*) => {
        $(
            $(#[$meta])*
            #[must_use]
            pub fn $name(&self, $($arg: $ty),*) -> PaginatedList<$item> {
                self.sequence(self.inner.$name($($arg),*))
            }
        )*
    };
}

/// A blocking Deezer client.
///
/// Cloning is cheap; clones share the runtime and the async client.
#[derive(Clone)]
pub struct Client {
    inner: rest::Client,
    runtime: Arc<Runtime>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("blocking::Client")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a blocking client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the HTTP client cannot be built and
    /// [`ResourceError::Runtime`] if the runtime cannot start.
    pub fn new(config: &ClientConfig) -> Result<Self, ResourceError> {
        Self::from_async(rest::Client::new(config)?)
    }

    /// Wraps an existing async client.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Runtime`] if the runtime cannot start.
    pub fn from_async(inner: rest::Client) -> Result<Self, ResourceError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    /// Returns the async client this facade drives.
    #[must_use]
    pub const fn as_async(&self) -> &rest::Client {
        &self.inner
    }

    /// Runs a future of the async engine to completion.
    ///
    /// Use it for anything the facade does not mirror, such as the eager
    /// relations of typed views.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Wraps an async sequence so that it can be read synchronously.
    #[must_use]
    pub fn sequence<T: FromEntity>(&self, list: rest::PaginatedList<T>) -> PaginatedList<T> {
        PaginatedList {
            inner: list,
            runtime: Arc::clone(&self.runtime),
        }
    }

    /// Reads a field of an entity, loading the full entity if needed.
    ///
    /// # Errors
    ///
    /// See [`Entity::get_or_fetch`].
    pub fn get_or_fetch(&self, entity: &Entity, name: &str) -> Result<Field, ResourceError> {
        self.block_on(entity.get_or_fetch(name))
    }

    /// Fetches a fresh, complete copy of an entity.
    ///
    /// # Errors
    ///
    /// See [`Entity::fetch`].
    pub fn fetch(&self, entity: &Entity) -> Result<Entity, ResourceError> {
        self.block_on(entity.fetch())
    }

    blocking! {
        /// Gets an album.
        fn get_album(album_id: impl Into<Identity>) -> Album;
        /// Gets an artist.
        fn get_artist(artist_id: impl Into<Identity>) -> Artist;
        /// Gets the chart of a genre (`0` for all genres).
        fn get_chart(genre_id: i64) -> Chart;
        /// Gets the top tracks of a genre.
        fn get_tracks_chart(genre_id: i64) -> Vec<Track>;
        /// Gets the top albums of a genre.
        fn get_albums_chart(genre_id: i64) -> Vec<Album>;
        /// Gets the top artists of a genre.
        fn get_artists_chart(genre_id: i64) -> Vec<Artist>;
        /// Gets the top playlists of a genre.
        fn get_playlists_chart(genre_id: i64) -> Vec<Playlist>;
        /// Gets the top podcasts of a genre.
        fn get_podcasts_chart(genre_id: i64) -> Vec<Podcast>;
        /// Gets an editorial.
        fn get_editorial(editorial_id: impl Into<Identity>) -> Editorial;
        /// Gets a podcast episode.
        fn get_episode(episode_id: impl Into<Identity>) -> Episode;
        /// Gets a genre.
        fn get_genre(genre_id: impl Into<Identity>) -> Genre;
        /// Lists every genre.
        fn list_genres() -> Vec<Genre>;
        /// Gets a playlist.
        fn get_playlist(playlist_id: impl Into<Identity>) -> Playlist;
        /// Gets a podcast.
        fn get_podcast(podcast_id: impl Into<Identity>) -> Podcast;
        /// Gets a radio.
        fn get_radio(radio_id: impl Into<Identity>) -> Radio;
        /// Lists every radio.
        fn list_radios() -> Vec<Radio>;
        /// Gets a track.
        fn get_track(track_id: impl Into<Identity>) -> Track;
        /// Gets a user, the authenticated one when `user_id` is `None`.
        fn get_user(user_id: Option<Identity>) -> User;
        /// Adds an album to the authenticated user's favorites.
        fn add_user_album(album_id: impl Into<Identity>) -> bool;
        /// Removes an album from the authenticated user's favorites.
        fn remove_user_album(album_id: impl Into<Identity>) -> bool;
        /// Adds an artist to the authenticated user's favorites.
        fn add_user_artist(artist_id: impl Into<Identity>) -> bool;
        /// Removes an artist from the authenticated user's favorites.
        fn remove_user_artist(artist_id: impl Into<Identity>) -> bool;
        /// Follows a user as the authenticated user.
        fn add_user_following(user_id: impl Into<Identity>) -> bool;
        /// Stops following a user as the authenticated user.
        fn remove_user_following(user_id: impl Into<Identity>) -> bool;
        /// Adds a track to the authenticated user's favorites.
        fn add_user_track(track_id: impl Into<Identity>) -> bool;
        /// Removes a track from the authenticated user's favorites.
        fn remove_user_track(track_id: impl Into<Identity>) -> bool;
        /// Adds a playlist to the authenticated user's favorites.
        fn add_user_playlist(playlist_id: impl Into<Identity>) -> bool;
        /// Removes a playlist from the authenticated user's favorites.
        fn remove_user_playlist(playlist_id: impl Into<Identity>) -> bool;
        /// Creates a playlist for the authenticated user and returns its id.
        fn create_playlist(title: &str) -> Identity;
        /// Deletes a playlist owned by the authenticated user.
        fn delete_playlist(playlist_id: impl Into<Identity>) -> bool;
    }

    sequences! {
        /// Lists editorials.
        fn list_editorials() -> Editorial;
        /// Lists the top radios.
        fn get_radios_top() -> Radio;
        /// Tracks recommended to the authenticated user.
        fn get_user_recommended_tracks() -> Track;
        /// Albums recommended to the authenticated user.
        fn get_user_recommended_albums() -> Album;
        /// Artists recommended to the authenticated user.
        fn get_user_recommended_artists() -> Artist;
        /// Playlists recommended to the authenticated user.
        fn get_user_recommended_playlists() -> Playlist;
        /// The authenticated user's flow.
        fn get_user_flow() -> Track;
        /// A user's favorite albums.
        fn get_user_albums(user_id: Option<Identity>) -> Album;
        /// A user's favorite artists.
        fn get_user_artists(user_id: Option<Identity>) -> Artist;
        /// A user's followers.
        fn get_user_followers(user_id: Option<Identity>) -> User;
        /// The users a user follows.
        fn get_user_followings(user_id: Option<Identity>) -> User;
        /// The authenticated user's listening history.
        fn get_user_history() -> Track;
        /// A user's favorite tracks.
        fn get_user_tracks(user_id: Option<Identity>) -> Track;
        /// Searches tracks.
        fn search(search: &Search) -> Track;
        /// Searches tracks.
        fn search_tracks(search: &Search) -> Track;
        /// Searches albums.
        fn search_albums(search: &Search) -> Album;
        /// Searches artists.
        fn search_artists(search: &Search) -> Artist;
        /// Searches playlists.
        fn search_playlists(search: &Search) -> Playlist;
    }
}

/// A paginated sequence read synchronously.
///
/// Every call drives the wrapped [`rest::PaginatedList`], so pages fetched
/// here are buffered exactly as they would be by the async API.
pub struct PaginatedList<T = Entity> {
    inner: rest::PaginatedList<T>,
    runtime: Arc<Runtime>,
}

impl<T: FromEntity> PaginatedList<T> {
    /// Returns the number of elements of the remote collection.
    ///
    /// # Errors
    ///
    /// See [`rest::PaginatedList::len`].
    pub fn len(&mut self) -> Result<usize, ResourceError> {
        self.runtime.block_on(self.inner.len())
    }

    /// Returns `true` if the remote collection is empty.
    ///
    /// # Errors
    ///
    /// See [`rest::PaginatedList::is_empty`].
    pub fn is_empty(&mut self) -> Result<bool, ResourceError> {
        self.runtime.block_on(self.inner.is_empty())
    }

    /// Returns the total announced by the API.
    ///
    /// # Errors
    ///
    /// See [`rest::PaginatedList::total`].
    pub fn total(&mut self) -> Result<usize, ResourceError> {
        self.runtime.block_on(self.inner.total())
    }

    /// Returns the item at `index`, fetching pages up to it.
    ///
    /// # Errors
    ///
    /// See [`rest::PaginatedList::get`].
    pub fn get(&mut self, index: usize) -> Result<T, ResourceError> {
        self.runtime.block_on(self.inner.get(index))
    }

    /// Returns the items in `start..stop`, `stop` defaulting to the end.
    ///
    /// # Errors
    ///
    /// See [`rest::PaginatedList::slice`].
    pub fn slice(&mut self, start: usize, stop: Option<usize>) -> Result<Vec<T>, ResourceError> {
        self.runtime.block_on(self.inner.slice(start, stop))
    }

    /// Fetches every remaining page and returns all items.
    ///
    /// # Errors
    ///
    /// See [`rest::PaginatedList::fetch_all`].
    pub fn fetch_all(&mut self) -> Result<Vec<T>, ResourceError> {
        let runtime = Arc::clone(&self.runtime);
        runtime
            .block_on(self.inner.fetch_all())
            .map(<[T]>::to_vec)
    }

    /// Returns the items fetched so far without any I/O.
    #[must_use]
    pub fn buffered(&self) -> &[T] {
        self.inner.buffered()
    }

    /// Returns the wrapped async sequence.
    #[must_use]
    pub fn into_async(self) -> rest::PaginatedList<T> {
        self.inner
    }

    /// Returns an iterator over the items, fetching pages as needed.
    ///
    /// The iterator starts from the first item and reuses pages already
    /// buffered. It yields an error at most once, then stops.
    pub fn iter(&mut self) -> Iter<'_, T> {
        Iter {
            inner: self.inner.iter(),
            runtime: Arc::clone(&self.runtime),
            failed: false,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PaginatedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// A blocking iterator over a [`PaginatedList`].
pub struct Iter<'a, T> {
    inner: rest::Iter<'a, T>,
    runtime: Arc<Runtime>,
    failed: bool,
}

impl<T: FromEntity> Iterator for Iter<'_, T> {
    type Item = Result<T, ResourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.runtime.block_on(self.inner.next());
        self.failed = matches!(item, Some(Err(_)));
        item
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

// Verify the facade is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
    assert_send_sync::<PaginatedList<Entity>>();
};
