use serde_json::json;
use spotsync::spotify::{ApiError, CatalogSearch, PlaylistStore, SpotifyClient};
use spotsync::spotify::client::PLAYLIST_FIELDS;
use spotsync::sync::PlaylistReconciler;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn client(server: &MockServer) -> SpotifyClient {
    SpotifyClient::new(server.uri(), TOKEN)
}

#[tokio::test]
async fn test_search_returns_first_hit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Daft Punk - Get Lucky"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "1"))
        .and(query_param("market", "NL"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {
                "items": [{
                    "id": "69kOkLUCkxIZYexIgSG8rq",
                    "name": "Get Lucky (feat. Pharrell Williams and Nile Rodgers)",
                    "uri": "spotify:track:69kOkLUCkxIZYexIgSG8rq",
                    "artists": [{ "name": "Daft Punk" }, { "name": "Pharrell Williams" }]
                }],
                "total": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client(&server)
        .search_tracks("Daft Punk - Get Lucky", 1, "NL")
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uri, "spotify:track:69kOkLUCkxIZYexIgSG8rq");
    assert_eq!(hits[0].artist, "Daft Punk");
    assert!(hits[0].name.starts_with("Get Lucky"));
}

#[tokio::test]
async fn test_search_without_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": { "items": [], "total": 0 }
        })))
        .mount(&server)
        .await;

    let hits = client(&server)
        .search_tracks("Nobody - Nothing", 1, "NL")
        .await
        .unwrap();

    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).search_tracks("A - B", 1, "NL").await;

    match result {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid token");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_beyond_threshold_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3600"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).search_tracks("A - B", 1, "NL").await;

    assert!(matches!(
        result,
        Err(ApiError::RateLimited { retry_after: 3600 })
    ));
}

#[tokio::test]
async fn test_short_rate_limit_is_waited_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {
                "items": [{
                    "name": "Song",
                    "uri": "spotify:track:1",
                    "artists": [{ "name": "Band" }]
                }],
                "total": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client(&server)
        .search_tracks("Band - Song", 1, "NL")
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uri, "spotify:track:1");
}

#[tokio::test]
async fn test_rate_limited_append_is_resent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .append_tracks("pl1", &["spotify:track:1".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bad_gateway_on_append_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let report = PlaylistReconciler::new(&client)
        .reconcile("pl1", &["spotify:track:1".to_string()])
        .await;

    assert!(!report.is_success());
    assert_eq!(report.chunks.len(), 1);
    assert!(report.chunks[0].removal.is_ok());
    assert!(matches!(
        report.chunks[0].append,
        Err(ApiError::Status { status: 502, .. })
    ));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 2);
}

#[tokio::test]
async fn test_playlist_page_projects_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlists/pl1/tracks"))
        .and(query_param("offset", "100"))
        .and(query_param("market", "NL"))
        .and(query_param("fields", PLAYLIST_FIELDS))
        .and(query_param("additional_types", "track"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "track": { "name": "Song A", "artists": [{ "name": "Artist A" }] } },
                { "track": null }
            ],
            "total": 102
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .playlist_page("pl1", 100, "NL")
        .await
        .unwrap();

    assert_eq!(page.total, 102);
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].artist, "Artist A");
    assert_eq!(page.entries[0].name, "Song A");
    assert_eq!(page.entries[1].name, "<unavailable>");
}

#[tokio::test]
async fn test_remove_all_occurrences_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/playlists/pl1/tracks"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "tracks": [
                { "uri": "spotify:track:1" },
                { "uri": "spotify:track:2" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s1" })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .remove_all_occurrences(
            "pl1",
            &["spotify:track:1".to_string(), "spotify:track:2".to_string()],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_append_tracks_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:1", "spotify:track:2"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s2" })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .append_tracks(
            "pl1",
            &["spotify:track:1".to_string(), "spotify:track:2".to_string()],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reconcile_against_http_api() {
    let server = MockServer::start().await;
    let target: Vec<String> = (0..25).map(|i| format!("spotify:track:{}", i)).collect();

    Mock::given(method("DELETE"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .and(body_json(json!({ "uris": target[20..25] })))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .and(body_json(json!({ "uris": target[0..20] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let report = PlaylistReconciler::new(&client)
        .reconcile("pl1", &target)
        .await;

    assert!(!report.is_success());
    let failed: Vec<usize> = report.failed_chunks().map(|c| c.index).collect();
    assert_eq!(failed, vec![1]);
    assert!(report.chunks[1].removal.is_ok());
    assert!(matches!(
        report.chunks[1].append,
        Err(ApiError::Status { status: 500, .. })
    ));
}
