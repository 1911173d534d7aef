//! The asynchronous Deezer client.
//!
//! [`Client`] ties the engine together: it sends requests through a
//! [`Transport`], rejects functional error envelopes, and materializes every
//! answer through the [`TypeRegistry`]. On top of that it offers the
//! convenience surface of the API (albums, charts, users, search, ...).
//!
//! The client is a cheap handle: clones share the same transport. Every
//! entity keeps a clone so it can load missing fields and follow relations;
//! dropping entities never affects the client.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{HttpClient, HttpMethod, HttpRequest, QueryParams, Transport};
use crate::config::ClientConfig;
use crate::rest::entity::{Entity, Field, FromEntity, Identity};
use crate::rest::materializer::{MaterializeOptions, Materialized, Materializer};
use crate::rest::pagination::PaginatedList;
use crate::rest::path::{entity_path, relation_path};
use crate::rest::registry::{Kind, TypeRegistry};
use crate::rest::resources::{
    Album, Artist, Chart, Editorial, Episode, Genre, Playlist, Podcast, Radio, Resource, Track,
    User,
};
use crate::rest::search::Search;
use crate::rest::ResourceError;

struct ClientInner {
    transport: Arc<dyn Transport>,
    registry: TypeRegistry,
}

/// Client for the Deezer API.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync` and cheap to clone.
///
/// # Example
///
/// ```rust,ignore
/// use deezer::{Client, ClientConfig};
///
/// let client = Client::new(&ClientConfig::default())?;
///
/// let album = client.get_album(302127).await?;
/// println!("{:?}", album.get_or_fetch("title").await?);
///
/// let mut tracks = album.tracks()?;
/// while let Some(track) = tracks.iter().next().await {
///     println!("- {}", track?);
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}

fn id_param(key: &str, id: impl Into<Identity>) -> QueryParams {
    let id: Identity = id.into();
    QueryParams::new().with(key, id)
}

fn user_segment(user_id: Option<Identity>) -> Identity {
    user_id.unwrap_or_else(|| Identity::from("me"))
}

impl Client {
    /// Creates a client talking HTTP to the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ResourceError> {
        Ok(Self::with_transport(HttpClient::new(config)?))
    }

    /// Creates a client over any transport.
    #[must_use]
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self::from_transport(Arc::new(transport))
    }

    /// Creates a client over a shared transport.
    #[must_use]
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                registry: TypeRegistry::default(),
            }),
        }
    }

    /// Returns a client with the same transport and another registry.
    #[must_use]
    pub fn with_registry(&self, registry: TypeRegistry) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport: Arc::clone(&self.inner.transport),
                registry,
            }),
        }
    }

    /// Returns the type registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// Sends a request and returns the raw JSON body.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Http`] for transport failures and non-2xx statuses
    /// - [`ResourceError::ErrorResponse`] if the body is an object with an
    ///   `error` field
    pub async fn request_json(
        &self,
        method: HttpMethod,
        path: &str,
        params: QueryParams,
    ) -> Result<Value, ResourceError> {
        let request = HttpRequest::builder(method, path).query(params).build();
        let response = self.inner.transport.send(request).await?;

        if response.body.get("error").is_some() {
            tracing::debug!(%method, path, "API answered with an error envelope");
            return Err(ResourceError::ErrorResponse {
                body: response.body,
            });
        }
        Ok(response.body)
    }

    /// Materializes a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResource`] for a record with neither
    /// a tag nor a hint, or [`ResourceError::MalformedRecord`] for payloads
    /// that cannot be turned into entities.
    pub fn materialize(
        &self,
        value: Value,
        options: MaterializeOptions<'_>,
    ) -> Result<Materialized, ResourceError> {
        Materializer::new(self).materialize(value, &options)
    }

    /// Sends a request and materializes the answer.
    ///
    /// # Errors
    ///
    /// Returns any error from [`request_json`](Self::request_json) or
    /// [`materialize`](Self::materialize).
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: QueryParams,
        options: MaterializeOptions<'_>,
    ) -> Result<Materialized, ResourceError> {
        let body = self.request_json(method, path, params).await?;
        self.materialize(body, options)
    }

    /// Returns a lazy sequence over a paginated collection path.
    #[must_use]
    pub fn paginate<T: FromEntity>(&self, path: &str, params: QueryParams) -> PaginatedList<T> {
        PaginatedList::new(self.clone(), path, params)
    }

    /// Creates an entity from just its kind and identity.
    ///
    /// No request is made. Any other field is loaded on first access
    /// through [`Entity::get_or_fetch`].
    #[must_use]
    pub fn stub(&self, kind: Kind, id: impl Into<Identity>) -> Entity {
        let id: Identity = id.into();
        let entity = Entity::new(kind.as_str(), self.registry().shape(kind), self.clone());
        entity.set_fields(vec![
            ("id".to_string(), Field::from(id)),
            ("type".to_string(), Field::String(kind.as_str().to_string())),
        ]);
        entity
    }

    async fn list<T: FromEntity>(&self, path: &str) -> Result<Vec<T>, ResourceError> {
        self.request(HttpMethod::Get, path, QueryParams::new(), MaterializeOptions::new())
            .await?
            .into_typed_list()
    }

    async fn write(
        &self,
        method: HttpMethod,
        path: &str,
        params: QueryParams,
    ) -> Result<bool, ResourceError> {
        self.request(method, path, params, MaterializeOptions::new())
            .await?
            .into_bool()
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Gets an album.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer is not an album.
    pub async fn get_album(&self, album_id: impl Into<Identity>) -> Result<Album, ResourceError> {
        Album::find(self, album_id.into()).await
    }

    /// Gets an artist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer is not an artist.
    pub async fn get_artist(&self, artist_id: impl Into<Identity>) -> Result<Artist, ResourceError> {
        Artist::find(self, artist_id.into()).await
    }

    /// Gets the charts of a genre (`0` for all genres).
    ///
    /// Charts carry neither a tag nor an id on the wire; the result is a
    /// chart whose identity is the genre id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_chart(&self, genre_id: i64) -> Result<Chart, ResourceError> {
        self.request(
            HttpMethod::Get,
            &entity_path("chart", genre_id),
            QueryParams::new(),
            MaterializeOptions::new()
                .type_hint(Kind::Chart)
                .implicit_id(genre_id),
        )
        .await?
        .into_typed()
    }

    /// Gets the top tracks of a genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_tracks_chart(&self, genre_id: i64) -> Result<Vec<Track>, ResourceError> {
        self.list(&relation_path("chart", genre_id, "tracks")).await
    }

    /// Gets the top albums of a genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_albums_chart(&self, genre_id: i64) -> Result<Vec<Album>, ResourceError> {
        self.list(&relation_path("chart", genre_id, "albums")).await
    }

    /// Gets the top artists of a genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_artists_chart(&self, genre_id: i64) -> Result<Vec<Artist>, ResourceError> {
        self.list(&relation_path("chart", genre_id, "artists")).await
    }

    /// Gets the top playlists of a genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_playlists_chart(&self, genre_id: i64) -> Result<Vec<Playlist>, ResourceError> {
        self.list(&relation_path("chart", genre_id, "playlists")).await
    }

    /// Gets the top podcasts of a genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_podcasts_chart(&self, genre_id: i64) -> Result<Vec<Podcast>, ResourceError> {
        self.list(&relation_path("chart", genre_id, "podcasts")).await
    }

    /// Gets an editorial page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_editorial(
        &self,
        editorial_id: impl Into<Identity>,
    ) -> Result<Editorial, ResourceError> {
        Editorial::find(self, editorial_id.into()).await
    }

    /// Lists editorial pages.
    #[must_use]
    pub fn list_editorials(&self) -> PaginatedList<Editorial> {
        self.paginate("editorial", QueryParams::new())
    }

    /// Gets a podcast episode.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_episode(&self, episode_id: impl Into<Identity>) -> Result<Episode, ResourceError> {
        Episode::find(self, episode_id.into()).await
    }

    /// Gets a genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_genre(&self, genre_id: impl Into<Identity>) -> Result<Genre, ResourceError> {
        Genre::find(self, genre_id.into()).await
    }

    /// Lists all genres.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_genres(&self) -> Result<Vec<Genre>, ResourceError> {
        self.list("genre").await
    }

    /// Gets a playlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_playlist(
        &self,
        playlist_id: impl Into<Identity>,
    ) -> Result<Playlist, ResourceError> {
        Playlist::find(self, playlist_id.into()).await
    }

    /// Gets a podcast.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_podcast(&self, podcast_id: impl Into<Identity>) -> Result<Podcast, ResourceError> {
        Podcast::find(self, podcast_id.into()).await
    }

    /// Gets a radio.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_radio(&self, radio_id: impl Into<Identity>) -> Result<Radio, ResourceError> {
        Radio::find(self, radio_id.into()).await
    }

    /// Lists all radios.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_radios(&self) -> Result<Vec<Radio>, ResourceError> {
        self.list("radio").await
    }

    /// Lists the top radios.
    #[must_use]
    pub fn get_radios_top(&self) -> PaginatedList<Radio> {
        self.paginate("radio/top", QueryParams::new())
    }

    /// Gets a track.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_track(&self, track_id: impl Into<Identity>) -> Result<Track, ResourceError> {
        Track::find(self, track_id.into()).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Gets a user, or the authenticated user when `user_id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_user(&self, user_id: Option<Identity>) -> Result<User, ResourceError> {
        User::find(self, user_segment(user_id)).await
    }

    fn user_list<T: FromEntity>(&self, user_id: Option<Identity>, relation: &str) -> PaginatedList<T> {
        self.paginate(
            &relation_path("user", user_segment(user_id), relation),
            QueryParams::new(),
        )
    }

    /// Lists tracks recommended to the authenticated user.
    #[must_use]
    pub fn get_user_recommended_tracks(&self) -> PaginatedList<Track> {
        self.paginate("user/me/recommendations/tracks", QueryParams::new())
    }

    /// Lists albums recommended to the authenticated user.
    #[must_use]
    pub fn get_user_recommended_albums(&self) -> PaginatedList<Album> {
        self.paginate("user/me/recommendations/albums", QueryParams::new())
    }

    /// Lists artists recommended to the authenticated user.
    #[must_use]
    pub fn get_user_recommended_artists(&self) -> PaginatedList<Artist> {
        self.paginate("user/me/recommendations/artists", QueryParams::new())
    }

    /// Lists playlists recommended to the authenticated user.
    #[must_use]
    pub fn get_user_recommended_playlists(&self) -> PaginatedList<Playlist> {
        self.paginate("user/me/recommendations/playlists", QueryParams::new())
    }

    /// Lists the authenticated user's flow.
    #[must_use]
    pub fn get_user_flow(&self) -> PaginatedList<Track> {
        self.paginate("user/me/flow", QueryParams::new())
    }

    /// Lists a user's favorite albums.
    #[must_use]
    pub fn get_user_albums(&self, user_id: Option<Identity>) -> PaginatedList<Album> {
        self.user_list(user_id, "albums")
    }

    /// Adds an album to the authenticated user's library.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_user_album(&self, album_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        let params = id_param("album_id", album_id);
        self.write(HttpMethod::Post, "user/me/albums", params).await
    }

    /// Removes an album from the authenticated user's library.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_user_album(&self, album_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        let params = id_param("album_id", album_id);
        self.write(HttpMethod::Delete, "user/me/albums", params).await
    }

    /// Lists a user's favorite artists.
    #[must_use]
    pub fn get_user_artists(&self, user_id: Option<Identity>) -> PaginatedList<Artist> {
        self.user_list(user_id, "artists")
    }

    /// Adds an artist to the authenticated user's library.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_user_artist(&self, artist_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        let params = id_param("artist_id", artist_id);
        self.write(HttpMethod::Post, "user/me/artists", params).await
    }

    /// Removes an artist from the authenticated user's library.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_user_artist(
        &self,
        artist_id: impl Into<Identity>,
    ) -> Result<bool, ResourceError> {
        let params = id_param("artist_id", artist_id);
        self.write(HttpMethod::Delete, "user/me/artists", params).await
    }

    /// Lists a user's followers.
    #[must_use]
    pub fn get_user_followers(&self, user_id: Option<Identity>) -> PaginatedList<User> {
        self.user_list(user_id, "followers")
    }

    /// Lists the users a user follows.
    #[must_use]
    pub fn get_user_followings(&self, user_id: Option<Identity>) -> PaginatedList<User> {
        self.user_list(user_id, "followings")
    }

    /// Follows a user as the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_user_following(&self, user_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        let params = id_param("user_id", user_id);
        self.write(HttpMethod::Post, "user/me/followings", params).await
    }

    /// Stops following a user as the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_user_following(
        &self,
        user_id: impl Into<Identity>,
    ) -> Result<bool, ResourceError> {
        let params = id_param("user_id", user_id);
        self.write(HttpMethod::Delete, "user/me/followings", params).await
    }

    /// Lists the authenticated user's recently played tracks.
    #[must_use]
    pub fn get_user_history(&self) -> PaginatedList<Track> {
        self.paginate("user/me/history", QueryParams::new())
    }

    /// Lists a user's favorite tracks.
    #[must_use]
    pub fn get_user_tracks(&self, user_id: Option<Identity>) -> PaginatedList<Track> {
        self.user_list(user_id, "tracks")
    }

    /// Adds a track to the authenticated user's library.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_user_track(&self, track_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        let params = id_param("track_id", track_id);
        self.write(HttpMethod::Post, "user/me/tracks", params).await
    }

    /// Removes a track from the authenticated user's library.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_user_track(&self, track_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        let params = id_param("track_id", track_id);
        self.write(HttpMethod::Delete, "user/me/tracks", params).await
    }

    /// Adds a playlist to the authenticated user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_user_playlist(
        &self,
        playlist_id: impl Into<Identity>,
    ) -> Result<bool, ResourceError> {
        let params = id_param("playlist_id", playlist_id);
        self.write(HttpMethod::Post, "user/me/playlists", params).await
    }

    /// Removes a playlist from the authenticated user's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_user_playlist(
        &self,
        playlist_id: impl Into<Identity>,
    ) -> Result<bool, ResourceError> {
        let params = id_param("playlist_id", playlist_id);
        self.write(HttpMethod::Delete, "user/me/playlists", params).await
    }

    /// Creates a playlist for the authenticated user and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer has no id.
    pub async fn create_playlist(&self, title: &str) -> Result<Identity, ResourceError> {
        let params = QueryParams::new().with("title", title);
        let created = self
            .request(
                HttpMethod::Post,
                "user/me/playlists",
                params,
                MaterializeOptions::new().type_hint(Kind::Playlist),
            )
            .await?
            .into_entity()?;
        created
            .id()
            .ok_or_else(|| ResourceError::missing(created.kind(), "id"))
    }

    /// Deletes a playlist owned by the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_playlist(&self, playlist_id: impl Into<Identity>) -> Result<bool, ResourceError> {
        let playlist_id: Identity = playlist_id.into();
        let path = entity_path("playlist", playlist_id);
        self.write(HttpMethod::Delete, &path, QueryParams::new()).await
    }

    // ========================================================================
    // Search
    // ========================================================================

    fn search_in<T: FromEntity>(&self, path: &str, search: &Search) -> PaginatedList<T> {
        self.paginate(path, search.to_params())
    }

    /// Searches tracks.
    #[must_use]
    pub fn search(&self, search: &Search) -> PaginatedList<Track> {
        self.search_in("search", search)
    }

    /// Searches tracks through the dedicated endpoint.
    #[must_use]
    pub fn search_tracks(&self, search: &Search) -> PaginatedList<Track> {
        self.search_in("search/track", search)
    }

    /// Searches albums.
    #[must_use]
    pub fn search_albums(&self, search: &Search) -> PaginatedList<Album> {
        self.search_in("search/album", search)
    }

    /// Searches artists.
    #[must_use]
    pub fn search_artists(&self, search: &Search) -> PaginatedList<Artist> {
        self.search_in("search/artist", search)
    }

    /// Searches playlists.
    #[must_use]
    pub fn search_playlists(&self, search: &Search) -> PaginatedList<Playlist> {
        self.search_in("search/playlist", search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpError, HttpResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Canned {
        body: Value,
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::ok(self.body.clone()))
        }
    }

    fn canned(body: Value) -> (Arc<Canned>, Client) {
        let transport = Arc::new(Canned {
            body,
            seen: Mutex::default(),
        });
        (transport.clone(), Client::from_transport(transport))
    }

    #[tokio::test]
    async fn test_error_envelope_is_a_functional_error() {
        let (_, client) = canned(json!({"error": {"type": "DataException", "code": 800}}));

        let error = client.get_album(0).await.unwrap_err();
        let body = error.error_body().unwrap();
        assert_eq!(body["error"]["code"], 800);
    }

    #[tokio::test]
    async fn test_get_chart_is_a_synthetic_chart() {
        let (transport, client) = canned(json!({
            "tracks": {"data": [{"id": 1, "type": "track"}], "total": 1}
        }));

        let chart = client.get_chart(0).await.unwrap();
        assert_eq!(chart.kind(), "chart");
        assert_eq!(chart.id(), Some(Identity::Int(0)));
        assert_eq!(transport.seen.lock().unwrap()[0].path, "chart/0");

        let tracks = chart.get("tracks").unwrap().entities();
        let parent = tracks[0].get("chart").unwrap().as_entity().unwrap();
        assert!(Entity::ptr_eq(&parent, chart.entity()));
    }

    #[tokio::test]
    async fn test_writes_return_booleans() {
        let (transport, client) = canned(json!(true));

        assert!(client.add_user_track(3_135_556).await.unwrap());
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].http_method, HttpMethod::Post);
        assert_eq!(seen[0].path, "user/me/tracks");
        assert_eq!(seen[0].query.get("track_id"), Some("3135556"));
    }

    #[tokio::test]
    async fn test_create_playlist_returns_new_id() {
        let (_, client) = canned(json!({"id": 908_622_995}));
        let id = client.create_playlist("Road trip").await.unwrap();
        assert_eq!(id, Identity::Int(908_622_995));
    }

    #[tokio::test]
    async fn test_user_paths_default_to_me() {
        let (_, client) = canned(json!({"data": []}));
        let albums = client.get_user_albums(None);
        assert_eq!(albums.path(), "user/me/albums");

        let tracks = client.get_user_tracks(Some(Identity::Int(5)));
        assert_eq!(tracks.path(), "user/5/tracks");
    }

    #[tokio::test]
    async fn test_wrong_kind_is_rejected_by_typed_getter() {
        let (_, client) = canned(json!({"id": 27, "type": "artist"}));
        let error = client.get_album(27).await.unwrap_err();
        assert!(matches!(error, ResourceError::MalformedRecord { .. }));
    }

    #[test]
    fn test_stub_has_identity_and_kind_only() {
        let (transport, client) = canned(json!(null));
        let album = client.stub(Kind::Album, 302_127);

        assert_eq!(album.kind(), "album");
        assert_eq!(album.field_names(), vec!["id", "type"]);
        assert!(transport.seen.lock().unwrap().is_empty());
    }
}
