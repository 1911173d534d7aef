//! Integration tests for paginated sequences.
//!
//! These tests drive [`PaginatedList`] over an in-memory transport and count
//! the requests it issues.

mod common;

use std::time::Duration;

use common::{client, tracks, Recorder};
use deezer::rest::resources::{Album, Artist, Radio, Resource, Track};
use deezer::{Entity, HttpError, Identity, Kind, PaginatedList, QueryParams, ResourceError};
use serde_json::json;

const BASE: &str = "https://api.deezer.com/chart/0/tracks";

/// Three pages of sizes 3, 3 and 1, announcing a total of 7.
fn seven_tracks() -> Recorder {
    Recorder::new()
        .route(
            "chart/0/tracks",
            json!({"data": tracks(1, 3), "total": 7, "next": format!("{BASE}?index=3")}),
        )
        .route(
            "chart/0/tracks?index=3",
            json!({"data": tracks(4, 3), "total": 7, "next": format!("{BASE}?index=6")}),
        )
        .route(
            "chart/0/tracks?index=6",
            json!({"data": tracks(7, 1), "total": 7}),
        )
}

fn ids(items: &[Track]) -> Vec<Identity> {
    items.iter().filter_map(|track| track.id()).collect()
}

// ============================================================================
// Exhaustiveness and Order
// ============================================================================

#[tokio::test]
async fn test_iteration_yields_every_item_in_page_order() {
    let (transport, client) = client(seven_tracks());
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let mut seen = Vec::new();
    let mut cursor = list.iter();
    while let Some(track) = cursor.next().await {
        seen.push(track.unwrap());
    }

    let expected: Vec<Identity> = (1..=7).map(Identity::from).collect();
    assert_eq!(ids(&seen), expected);
    assert_eq!(transport.count(), 3);

    assert_eq!(list.len().await.unwrap(), 7);
    assert_eq!(transport.count(), 3, "len must reuse the observed total");
}

#[tokio::test]
async fn test_second_iteration_reuses_the_buffer() {
    let (transport, client) = client(seven_tracks());
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    list.fetch_all().await.unwrap();
    assert_eq!(transport.count(), 3);

    let mut count = 0;
    let mut cursor = list.iter();
    while let Some(track) = cursor.next().await {
        track.unwrap();
        count += 1;
    }

    assert_eq!(count, 7);
    assert_eq!(transport.count(), 3);
}

#[tokio::test]
async fn test_iteration_resumes_from_partial_buffer() {
    let (transport, client) = client(seven_tracks());
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    list.get(1).await.unwrap();
    assert_eq!(transport.count(), 1);

    let mut cursor = list.iter();
    let mut all = Vec::new();
    while let Some(track) = cursor.next().await {
        all.push(track.unwrap());
    }

    assert_eq!(all.len(), 7);
    assert_eq!(
        transport.keys(),
        vec!["chart/0/tracks", "chart/0/tracks?index=3", "chart/0/tracks?index=6"]
    );
}

// ============================================================================
// Index Access and Slicing
// ============================================================================

#[tokio::test]
async fn test_get_fetches_only_the_pages_it_needs() {
    let base = "https://api.deezer.com/editorial/0/releases";
    let recorder = Recorder::new()
        .route("editorial/0/releases", json!({"data": tracks(0, 3), "next": format!("{base}?cursor=2")}))
        .route("editorial/0/releases?cursor=2", json!({"data": tracks(3, 3), "next": format!("{base}?cursor=3")}))
        .route("editorial/0/releases?cursor=3", json!({"data": tracks(6, 3), "next": format!("{base}?cursor=4")}))
        .route("editorial/0/releases?cursor=4", json!({"data": tracks(9, 3)}));
    let (transport, client) = client(recorder);
    let mut list: PaginatedList<Entity> = client.paginate("editorial/0/releases", QueryParams::new());

    let item = list.get(7).await.unwrap();

    assert_eq!(item.id(), Some(Identity::Int(7)));
    assert_eq!(transport.count(), 3);
    assert!(list.could_grow());
}

#[tokio::test]
async fn test_get_past_the_end_is_out_of_range() {
    let (transport, client) = client(seven_tracks());
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let error = list.get(7).await.unwrap_err();

    assert!(matches!(
        error,
        ResourceError::IndexOutOfRange { index: 7, available: 7 }
    ));
    assert_eq!(transport.count(), 3);

    // Exhaustion is terminal: asking again costs nothing.
    assert!(list.get(100).await.is_err());
    assert_eq!(transport.count(), 3);
}

#[tokio::test]
async fn test_bounded_slice_stops_growing_at_stop() {
    let (transport, client) = client(seven_tracks());
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let items = list.slice(2, Some(5)).await.unwrap();

    assert_eq!(ids(&items), vec![3.into(), 4.into(), 5.into()]);
    assert_eq!(transport.count(), 2);
}

#[tokio::test]
async fn test_open_slice_walks_to_the_end() {
    let (transport, client) = client(seven_tracks());
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let items = list.slice(5, None).await.unwrap();

    assert_eq!(ids(&items), vec![6.into(), 7.into()]);
    assert_eq!(transport.count(), 3);
}

// ============================================================================
// Length
// ============================================================================

#[tokio::test]
async fn test_len_probes_with_a_single_item_page() {
    let recorder = seven_tracks().route(
        "chart/0/tracks?limit=1",
        json!({"data": tracks(1, 1), "total": 7, "next": format!("{BASE}?limit=1&index=1")}),
    );
    let (transport, client) = client(recorder);
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    assert_eq!(list.len().await.unwrap(), 7);
    assert_eq!(list.len().await.unwrap(), 7);

    assert_eq!(transport.keys(), vec!["chart/0/tracks?limit=1"]);
    assert!(list.buffered().is_empty(), "the probe must not fill the buffer");
}

#[tokio::test]
async fn test_len_of_exhausted_list_without_total_counts_the_buffer() {
    let recorder = Recorder::new().route("user/5/flow", json!({"data": tracks(1, 2)}));
    let (transport, client) = client(recorder);
    let mut list: PaginatedList<Track> = client.paginate("user/5/flow", QueryParams::new());

    list.fetch_all().await.unwrap();
    assert_eq!(list.len().await.unwrap(), 2);
    assert_eq!(transport.count(), 1);
}

// ============================================================================
// Failure and Cancellation
// ============================================================================

#[tokio::test]
async fn test_failed_growth_leaves_the_sequence_unchanged() {
    let recorder = Recorder::new()
        .route(
            "chart/0/tracks",
            json!({"data": tracks(1, 3), "total": 7, "next": format!("{BASE}?index=3")}),
        )
        .fail("chart/0/tracks?index=3", 503);
    let (_, client) = client(recorder);
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let error = list.get(4).await.unwrap_err();

    assert!(error.is_retryable());
    assert!(matches!(error, ResourceError::Http(HttpError::Retryable(_))));
    assert_eq!(list.buffered().len(), 3);
    assert!(list.could_grow());
}

#[tokio::test]
async fn test_cancelled_growth_applies_no_partial_page() {
    let recorder = seven_tracks().with_delay(Duration::from_millis(200));
    let (transport, client) = client(recorder);
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let cancelled = tokio::time::timeout(Duration::from_millis(5), list.get(0)).await;

    assert!(cancelled.is_err());
    assert_eq!(transport.count(), 1);
    assert!(list.buffered().is_empty());
    assert!(list.could_grow());
    assert_eq!(list.known_total(), None);

    let first = list.get(0).await.unwrap();
    assert_eq!(first.id(), Some(Identity::Int(1)));
}

#[tokio::test]
async fn test_relative_next_url_is_rejected() {
    let recorder = Recorder::new().route(
        "chart/0/tracks",
        json!({"data": tracks(1, 1), "next": "/chart/0/tracks?index=1"}),
    );
    let (_, client) = client(recorder);
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let error = list.get(0).await.unwrap_err();
    assert!(matches!(error, ResourceError::InvalidNextUrl { .. }));
}

// ============================================================================
// Query Parameters and Hints
// ============================================================================

#[tokio::test]
async fn test_relation_params_reach_every_request() {
    let recorder = Recorder::new()
        .route(
            "album/1/tracks?limit=2",
            json!({"data": tracks(1, 2), "next": "https://api.deezer.com/album/1/tracks?limit=2&index=2"}),
        )
        .route("album/1/tracks?limit=2&index=2", json!({"data": tracks(3, 1)}))
        .route("album/1/tracks?limit=1", json!({"data": tracks(1, 1), "total": 3}));
    let (transport, client) = client(recorder);
    let album = Album::wrap(client.stub(Kind::Album, 1));

    let mut list = album
        .tracks()
        .unwrap()
        .with_params(QueryParams::new().with("limit", 2));

    assert_eq!(list.len().await.unwrap(), 3);
    let all = list.fetch_all().await.unwrap().to_vec();

    assert_eq!(ids(&all), vec![1.into(), 2.into(), 3.into()]);
    assert_eq!(
        transport.keys(),
        vec![
            "album/1/tracks?limit=1",
            "album/1/tracks?limit=2",
            "album/1/tracks?limit=2&index=2"
        ]
    );
}

#[tokio::test]
async fn test_eager_relation_forwards_params() {
    let recorder = Recorder::new().route(
        "artist/27/radio?limit=2",
        json!({"data": tracks(1, 2)}),
    );
    let (transport, client) = client(recorder);
    let artist = Artist::wrap(client.stub(Kind::Artist, 27));

    let radio = artist
        .radio_with(QueryParams::new().with("limit", 2))
        .await
        .unwrap();

    assert_eq!(radio.len(), 2);
    assert_eq!(transport.keys(), vec!["artist/27/radio?limit=2"]);
}

#[tokio::test]
async fn test_type_hint_types_tagless_pages() {
    let recorder = Recorder::new()
        .route(
            "radio/top",
            json!({
                "data": [{"id": 1, "title": "Rock"}, {"id": 2, "title": "Jazz"}],
                "next": "https://api.deezer.com/radio/top?index=2"
            }),
        )
        .route("radio/top?index=2", json!({"data": [{"id": 3, "title": "Soul"}]}));
    let (transport, client) = client(recorder);
    let mut list: PaginatedList<Radio> =
        PaginatedList::new(client, "radio/top", QueryParams::new()).with_type_hint(Kind::Radio);

    let radios = list.fetch_all().await.unwrap().to_vec();

    assert_eq!(radios.len(), 3);
    assert!(radios.iter().all(|radio| radio.kind() == "radio"));
    assert_eq!(radios[2].get("title").unwrap().as_str(), Some("Soul"));
    assert_eq!(transport.count(), 2);
}

// ============================================================================
// Typed Items and Debug
// ============================================================================

#[tokio::test]
async fn test_items_of_another_kind_are_rejected() {
    let recorder = Recorder::new().route(
        "chart/0/tracks",
        json!({"data": [{"id": 27, "type": "artist", "name": "Daft Punk"}]}),
    );
    let (_, client) = client(recorder);
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let error = list.get(0).await.unwrap_err();
    assert!(matches!(error, ResourceError::MalformedRecord { .. }));
}

#[tokio::test]
async fn test_debug_previews_the_buffer_without_io() {
    let (transport, client) = client(seven_tracks());
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let empty = format!("{list:?}");
    assert!(empty.starts_with("<PaginatedList chart/0/tracks []"));

    list.get(0).await.unwrap();
    let partial = format!("{list:?}");
    assert!(partial.contains("Int(1)"));
    assert!(partial.ends_with(" ...>"));
    assert_eq!(transport.count(), 1);
}

// ============================================================================
// Synchronous Driving
// ============================================================================

#[test]
fn test_sequence_driven_from_synchronous_code() {
    let (transport, client) = client(seven_tracks());
    let mut list: PaginatedList<Track> = client.paginate("chart/0/tracks", QueryParams::new());

    let total = tokio_test::block_on(list.total()).unwrap();
    let all = tokio_test::block_on(list.fetch_all()).unwrap().len();

    assert_eq!(total, 7);
    assert_eq!(all, 7);
    assert_eq!(transport.count(), 3);
}
