//! Unsplash adapter against a local mock of the search endpoint

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use guide_images::config::UnsplashSettings;
use guide_images::sources::{ImageSource, SearchOptions, UnsplashSource};
use serde_json::json;

#[derive(Clone, Default)]
struct MockUnsplash {
    /// (authorization header, query, per_page) per request
    requests: Arc<Mutex<Vec<(String, String, String)>>>,
    fail: bool,
}

async fn search_photos(
    State(mock): State<MockUnsplash>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    mock.requests.lock().unwrap().push((
        auth.clone(),
        params.get("query").cloned().unwrap_or_default(),
        params.get("per_page").cloned().unwrap_or_default(),
    ));

    if mock.fail {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    if auth != "Client-ID test-key" {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }

    Json(json!({
        "total": 2,
        "results": [
            {
                "id": "p1",
                "width": 4000,
                "height": 2667,
                "description": "Toit brewery in the evening",
                "alt_description": "people at a brewery",
                "urls": {
                    "regular": "https://images.unsplash.com/photo-p1?w=1080",
                    "thumb": "https://images.unsplash.com/photo-p1?w=200"
                },
                "links": { "html": "https://unsplash.com/photos/p1" },
                "user": { "name": "Kiran M", "username": "kiranm" },
                "tags": [{ "title": "brewery" }, { "title": "toit" }]
            },
            {
                "id": "p2",
                "width": 3000,
                "height": 2000,
                "urls": { "full": "https://images.unsplash.com/photo-p2" },
                "user": { "username": "anon" }
            }
        ]
    }))
    .into_response()
}

/// Serve the mock on an ephemeral port; returns its base URL
async fn start_mock(mock: MockUnsplash) -> String {
    let app = Router::new()
        .route("/search/photos", get(search_photos))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn source(base_url: String, key: &str) -> UnsplashSource {
    let settings = UnsplashSettings {
        base_url,
        geography_terms: vec!["Bangalore".to_string(), "India".to_string()],
    };
    UnsplashSource::new(Some(key.to_string()), &settings).unwrap()
}

#[tokio::test]
async fn test_search_maps_photos() {
    let mock = MockUnsplash::default();
    let base = start_mock(mock.clone()).await;

    let results = source(base, "test-key")
        .search("toit brewery", SearchOptions { limit: 5 })
        .await;

    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.url, "https://images.unsplash.com/photo-p1?w=1080");
    assert_eq!(first.attribution.author, "Kiran M");
    assert_eq!(first.attribution.license.as_deref(), Some("Unsplash License"));
    assert_eq!(first.tags, vec!["brewery", "toit"]);
    // 0.5 + 0.3 description + 0.2 for two overlapping tags
    assert!((first.relevance_score - 1.0).abs() < 1e-9);

    let second = &results[1];
    assert_eq!(second.url, "https://images.unsplash.com/photo-p2");
    assert_eq!(second.attribution.author, "anon");
    assert_eq!(second.relevance_score, 0.5);
}

#[tokio::test]
async fn test_request_carries_key_geography_and_page_size() {
    let mock = MockUnsplash::default();
    let base = start_mock(mock.clone()).await;

    source(base, "test-key")
        .search("Ulsoor Lake", SearchOptions { limit: 50 })
        .await;

    let requests = mock.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let (auth, query, per_page) = &requests[0];
    assert_eq!(auth, "Client-ID test-key");
    assert_eq!(query, "Ulsoor Lake Bangalore India");
    assert_eq!(per_page, "30", "per_page is capped at the provider maximum");
}

#[tokio::test]
async fn test_server_error_yields_empty() {
    let mock = MockUnsplash {
        fail: true,
        ..Default::default()
    };
    let base = start_mock(mock.clone()).await;

    let results = source(base, "test-key").search("anything", SearchOptions::default()).await;

    assert!(results.is_empty());
    assert_eq!(mock.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_key_yields_empty() {
    let base = start_mock(MockUnsplash::default()).await;
    let results = source(base, "wrong-key").search("anything", SearchOptions::default()).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_yields_empty() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let results = source(format!("http://{}", addr), "test-key")
        .search("anything", SearchOptions::default())
        .await;
    assert!(results.is_empty());
}
