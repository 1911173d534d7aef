//! End-to-end tests over the reqwest transport.
//!
//! A wiremock server stands in for the Deezer API; the engine talks to it
//! through [`HttpClient`](deezer::HttpClient) exactly as it would in
//! production.

use deezer::rest::Search;
use deezer::{AccessToken, BaseUrl, Client, ClientConfig, Entity, HttpError, ResourceError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .access_token(AccessToken::new("secret-token").unwrap())
        .build()
        .unwrap();
    Client::new(&config).unwrap()
}

// ============================================================================
// Album Workflow
// ============================================================================

#[tokio::test]
async fn test_album_tracks_walk_next_urls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/album/302127"))
        .and(query_param("access_token", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 302127, "type": "album", "title": "Discovery"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The second page is mounted first so that it wins over the first.
    Mock::given(method("GET"))
        .and(path("/album/302127/tracks"))
        .and(query_param("index", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 3, "type": "track", "title": "Digital Love"}],
            "total": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/album/302127/tracks"))
        .and(query_param("access_token", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "type": "track", "title": "One More Time"},
                {"id": 2, "type": "track", "title": "Aerodynamic"}
            ],
            "total": 3,
            "next": format!("{}/album/302127/tracks?index=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let album = client.get_album(302127).await.unwrap();
    let mut tracks = album.tracks().unwrap();

    let all = tracks.fetch_all().await.unwrap().to_vec();

    assert_eq!(all.len(), 3);
    assert_eq!(all[2].get("title").unwrap().as_str(), Some("Digital Love"));
    for track in &all {
        let parent = track.get("album").unwrap().as_entity().unwrap();
        assert!(Entity::ptr_eq(&parent, &album));
    }
    assert_eq!(tracks.len().await.unwrap(), 3);
}

#[tokio::test]
async fn test_error_envelope_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/track/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"type": "DataException", "message": "no data", "code": 800}
        })))
        .mount(&server)
        .await;

    let error = client_for(&server).get_track(0).await.unwrap_err();

    assert!(matches!(error, ResourceError::ErrorResponse { .. }));
    assert_eq!(error.error_body().unwrap()["error"]["type"], "DataException");
}

#[tokio::test]
async fn test_server_errors_are_retryable() {
    let server = MockServer::start().await;
    Mock::given(path("/artist/27"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let error = client_for(&server).get_artist(27).await.unwrap_err();

    assert!(error.is_retryable());
    assert!(matches!(error, ResourceError::Http(HttpError::Retryable(_))));
}

// ============================================================================
// Lazy Loading and Writes
// ============================================================================

#[tokio::test]
async fn test_embedded_artist_loads_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/track/3135556"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3135556,
            "type": "track",
            "title": "Harder, Better, Faster, Stronger",
            "artist": {"id": 27, "type": "artist", "name": "Daft Punk"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artist/27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 27, "type": "artist", "name": "Daft Punk", "nb_fan": 4_000_000, "nb_album": 31
        })))
        .expect(1)
        .mount(&server)
        .await;

    let track = client_for(&server).get_track(3135556).await.unwrap();
    let artist = track.get("artist").unwrap().as_entity().unwrap();

    assert_eq!(artist.get_or_fetch("nb_fan").await.unwrap().as_i64(), Some(4_000_000));
    assert_eq!(artist.get_or_fetch("nb_album").await.unwrap().as_i64(), Some(31));
}

#[tokio::test]
async fn test_playlist_write_sends_post() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlist/908622995"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 908622995, "type": "playlist", "title": "Mix"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlist/908622995/tracks"))
        .and(query_param("songs", "1,2,3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;

    let playlist = client_for(&server).get_playlist(908622995).await.unwrap();

    assert!(playlist.add_tracks([1, 2, 3]).await.unwrap());
}

#[tokio::test]
async fn test_search_parameters_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/album"))
        .and(query_param("q", r#"artist:"Daft Punk""#))
        .and(query_param("strict", "on"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 302127, "type": "album", "title": "Discovery"}],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut albums = client.search_albums(&Search::new("").artist("Daft Punk").strict(true));

    let first = albums.get(0).await.unwrap();
    assert_eq!(first.get("title").unwrap().as_str(), Some("Discovery"));
}
