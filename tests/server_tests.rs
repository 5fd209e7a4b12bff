// HTTP surface tests driven through the router
// Author: kelexine (https://github.com/kelexine)

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use clause_review::config::AppConfig;
use clause_review::server::create_router;
use common::{cache_config, fixture, Fixture};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use tower::ServiceExt;

fn app(f: &Fixture) -> Router {
    create_router(AppConfig::default(), f.service.clone()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_stats_shape_on_fresh_service() {
    let f = fixture(cache_config(500, 3600));
    let (status, body) = send(app(&f), get("/admin/cache/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comparison_cache"]["size"], 0);
    assert_eq!(body["comparison_cache"]["max_size"], 500);
    assert_eq!(body["comparison_cache"]["ttl_seconds"], 3600);
    assert_eq!(body["embedding_cache"]["size"], 0);
    assert_eq!(body["metrics"]["comparisons_total"], 0);
    assert_eq!(body["metrics"]["comparisons_cached"], 0);
    assert_eq!(body["metrics"]["embeddings_total"], 0);
    assert_eq!(body["metrics"]["embeddings_cached"], 0);
    assert_eq!(body["metrics"]["avg_comparison_time"], 0.0);
    assert_eq!(body["metrics"]["avg_embedding_time"], 0.0);
}

#[tokio::test]
async fn test_compare_twice_is_served_from_cache() {
    let f = fixture(cache_config(10, 3600));
    let request = || {
        post_json(
            "/v1/clauses/compare",
            json!({"contract_text": "Liability is unlimited.", "clause_id": "clause-1"}),
        )
    };

    let (status, first) = send(app(&f), request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["clause_id"], "clause-1");
    assert_eq!(first["risk_level"], "medium");

    let (_, second) = send(app(&f), request()).await;
    assert_eq!(first, second);
    assert_eq!(f.comparator.calls.load(Ordering::SeqCst), 1);

    let (_, stats) = send(app(&f), get("/admin/cache/stats")).await;
    assert_eq!(stats["metrics"]["comparisons_total"], 2);
    assert_eq!(stats["metrics"]["comparisons_cached"], 1);
}

#[tokio::test]
async fn test_compare_unknown_clause_is_404() {
    let f = fixture(cache_config(10, 3600));
    let (status, body) = send(
        app(&f),
        post_json(
            "/v1/clauses/compare",
            json!({"contract_text": "Anything.", "clause_id": "missing"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found_error");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let f = fixture(cache_config(10, 3600));
    let request = Request::builder()
        .method("POST")
        .uri("/v1/embeddings")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app(&f), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_embeddings_endpoint() {
    let f = fixture(cache_config(10, 3600));
    let (status, body) = send(app(&f), post_json("/v1/embeddings", json!({"text": "force majeure"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dimensions"], 2);
    assert_eq!(body["embedding"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_provider_failure_maps_to_gateway_error() {
    let f = fixture(cache_config(10, 3600));
    f.comparator.fail.store(true, Ordering::SeqCst);

    let (status, body) = send(
        app(&f),
        post_json(
            "/v1/clauses/compare",
            json!({"contract_text": "Text.", "clause_id": "clause-2"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["type"], "api_error");
    assert_eq!(f.service.stats().comparison_cache.size, 0);
}

#[tokio::test]
async fn test_clear_with_and_without_metric_reset() {
    let f = fixture(cache_config(10, 3600));
    f.service.compare("Text.", "clause-1").await.unwrap();

    let clear = |uri: &str| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(app(&f), clear("/admin/cache/clear")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metrics_reset"], false);
    assert_eq!(body["stats"]["comparison_cache"]["size"], 0);
    assert_eq!(body["stats"]["metrics"]["comparisons_total"], 1);

    let (_, body) = send(app(&f), clear("/admin/cache/clear?reset_metrics=true")).await;
    assert_eq!(body["metrics_reset"], true);
    assert_eq!(body["stats"]["metrics"]["comparisons_total"], 0);
}

#[tokio::test]
async fn test_list_clauses() {
    let f = fixture(cache_config(10, 3600));
    let (status, body) = send(app(&f), get("/v1/clauses")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["clause-1", "clause-2"]);
}

#[tokio::test]
async fn test_health_reports_degraded_without_api_key() {
    let f = fixture(cache_config(10, 3600));
    let (status, body) = send(app(&f), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["clause_library"]["status"], "ok");
    assert_eq!(body["checks"]["provider"]["status"], "warning");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let f = fixture(cache_config(10, 3600));
    let response = app(&f).oneshot(get("/health")).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_contract_larger_than_two_megabytes_is_accepted() {
    let f = fixture(cache_config(10, 3600));
    let contract = "The Supplier shall maintain insurance. ".repeat(100_000);
    assert!(contract.len() > 3 * 1024 * 1024);

    let (status, body) = send(
        app(&f),
        post_json(
            "/v1/clauses/compare",
            json!({"contract_text": contract, "clause_id": "clause-1"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clause_id"], "clause-1");
    assert_eq!(f.comparator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_body_over_ten_megabytes_is_rejected() {
    let f = fixture(cache_config(10, 3600));
    let contract = "x".repeat(11 * 1024 * 1024);

    let (status, _) = send(
        app(&f),
        post_json(
            "/v1/clauses/compare",
            json!({"contract_text": contract, "clause_id": "clause-1"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(f.comparator.calls.load(Ordering::SeqCst), 0);
}
