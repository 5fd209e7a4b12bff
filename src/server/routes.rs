// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    cache_clear_handler, cache_stats_handler, compare_handler, embeddings_handler,
    health_handler, list_clauses_handler, metrics_handler,
};
use super::middleware::{request_id_layers, track_metrics};
use crate::config::AppConfig;
use crate::error::Result;
use crate::review::ReviewService;
use axum::extract::DefaultBodyLimit;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<ReviewService>,
}

pub fn create_router(config: AppConfig, service: Arc<ReviewService>) -> Result<Router> {
    let enable_compression = config.performance.enable_compression;
    let state = AppState {
        config: Arc::new(config),
        service,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/v1/embeddings", post(embeddings_handler))
        .route("/v1/clauses", get(list_clauses_handler))
        .route("/v1/clauses/compare", post(compare_handler))
        .route("/admin/cache/stats", get(cache_stats_handler))
        .route("/admin/cache/clear", post(cache_clear_handler))
        .route_layer(axum::middleware::from_fn(track_metrics))
        // Whole contracts are posted as text; lift axum's 2 MB extractor
        // default to the same ceiling as the transport limit
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id)
                .layer(propagate_request_id)
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    let app = if enable_compression {
        app.layer(CompressionLayer::new())
    } else {
        app
    };

    Ok(app)
}
