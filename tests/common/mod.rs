#![allow(dead_code)]

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use shortio_dash::config::Config;
use shortio_dash::routes::app_router;
use shortio_dash::state::AppState;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Key the stub upstream accepts; anything else gets a 401.
pub const GOOD_KEY: &str = "sk_good";

pub fn test_config(api_base: &str, stats_base: &str) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        public_origin: Some("https://track.example.com".to_string()),
        preview_domain_suffix: ".pages.dev".to_string(),
        shortio_api_base: api_base.to_string(),
        shortio_stats_base: stats_base.to_string(),
        upstream_timeout_seconds: 5,
        gateway_endpoint: "http://127.0.0.1:3000/shortio-api".to_string(),
        storage_path: ".shortio-dash.json".to_string(),
    }
}

/// Serves a router on an ephemeral local port, returning its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Spawns a real forwarding endpoint against the given upstream base and
/// returns its `/shortio-api` URL.
pub async fn spawn_proxy(upstream_base: &str) -> String {
    let config = test_config(upstream_base, upstream_base);
    let state = AppState::new(config).unwrap();
    let base = spawn(app_router(state)).await;
    format!("{base}/shortio-api")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(GOOD_KEY)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Unauthorized: invalid API key"})),
    )
}

pub fn domain_stats_body() -> Value {
    json!({
        "clicks": 100,
        "humanClicks": 80,
        "links": 1,
        "clickStatistics": {
            "datasets": [{"data": [
                {"x": "2026-05-01", "y": 40},
                {"x": "2026-05-02", "y": 60}
            ]}]
        },
        "referer": [{"referer": "google.com", "score": 55}],
        "browser": [{"browser": "Chrome", "score": 70}],
        "country": [{"country": "US", "countryName": "United States", "score": 90}],
        "os": [{"os": "iOS", "score": 30}]
    })
}

pub fn link_page_body() -> Value {
    json!({
        "links": [{
            "id": "l1",
            "path": "promo",
            "shortURL": "https://example.com/promo",
            "originalURL": "https://example.com/landing"
        }],
        "nextPageToken": null,
        "count": 1
    })
}

/// A stand-in for the two short.io upstreams, counting every request and
/// rejecting any key other than [`GOOD_KEY`].
pub fn shortio_stub(hits: Arc<AtomicUsize>) -> Router {
    let counted = move |hits: &Arc<AtomicUsize>, headers: &HeaderMap| {
        hits.fetch_add(1, Ordering::SeqCst);
        authorized(headers)
    };

    let h = hits.clone();
    let c = counted.clone();
    let domains = get(move |headers: HeaderMap| async move {
        if !c(&h, &headers) {
            return unauthorized();
        }
        (
            StatusCode::OK,
            Json(json!([{"id": "dom_1", "hostname": "example.com"}])),
        )
    });

    let h = hits.clone();
    let c = counted.clone();
    let domain_stats = get(move |headers: HeaderMap| async move {
        if !c(&h, &headers) {
            return unauthorized();
        }
        (StatusCode::OK, Json(domain_stats_body()))
    });

    let h = hits.clone();
    let c = counted.clone();
    let links = get(move |headers: HeaderMap| async move {
        if !c(&h, &headers) {
            return unauthorized();
        }
        (StatusCode::OK, Json(link_page_body()))
    });

    let h = hits.clone();
    let c = counted.clone();
    let link_stats = get(move |headers: HeaderMap| async move {
        if !c(&h, &headers) {
            return unauthorized();
        }
        (
            StatusCode::OK,
            Json(json!({"totalClicks": 42, "humanClicks": 40})),
        )
    });

    let h = hits.clone();
    let c = counted.clone();
    let link_info = get(move |headers: HeaderMap| async move {
        if !c(&h, &headers) {
            return unauthorized();
        }
        (
            StatusCode::OK,
            Json(json!({
                "id": "l1",
                "path": "promo",
                "shortURL": "https://example.com/promo",
                "originalURL": "https://example.com/landing"
            })),
        )
    });

    Router::new()
        .route("/api/domains", domains)
        .route("/statistics/domain/{id}", domain_stats)
        .route("/api/links", links)
        .route("/statistics/link/{id}", link_stats)
        .route("/links/{id}", link_info)
}
