// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{Result, ServiceError};
use crate::library::ClauseSummary;
use crate::providers::ComparisonResult;
use crate::review::ServiceStats;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

impl HealthCheck {
    fn ok(message: String) -> Self {
        Self {
            status: "ok".to_string(),
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            status: "warning".to_string(),
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
    pub dimensions: usize,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub contract_text: String,
    pub clause_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearParams {
    #[serde(default)]
    pub reset_metrics: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub status: String,
    pub metrics_reset: bool,
    pub stats: ServiceStats,
}

/// Deserialize a raw body, reporting problems as `invalid_request_error`.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        debug!("Rejected request body: {}", e);
        ServiceError::InvalidRequest(format!("JSON deserialization error: {}", e))
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let library_size = state.service.library().len();
    let library_check = if library_size == 0 {
        overall_status = HealthStatus::Degraded;
        HealthCheck::warning(format!(
            "Clause library is empty ({}), comparisons will 404",
            state.config.library.path
        ))
    } else {
        HealthCheck::ok(format!("{} clauses loaded", library_size))
    };
    checks.insert("clause_library".to_string(), library_check);

    let provider_check = if state.config.provider.api_key.is_empty() {
        overall_status = HealthStatus::Degraded;
        HealthCheck::warning("No provider API key configured".to_string())
    } else {
        HealthCheck::ok(format!("Provider: {}", state.config.provider.api_base_url))
    };
    checks.insert("provider".to_string(), provider_check);

    let stats = state.service.stats();
    checks.insert(
        "caches".to_string(),
        HealthCheck::ok(format!(
            "comparison {}/{}, embedding {}/{}",
            stats.comparison_cache.size,
            stats.comparison_cache.max_size,
            stats.embedding_cache.size,
            stats.embedding_cache.max_size
        )),
    );

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for `POST /v1/embeddings`
pub async fn embeddings_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<EmbeddingResponse>> {
    let req: EmbeddingRequest = parse_body(&body)?;
    debug!("Embedding request: {} chars", req.text.len());

    let embedding = state.service.embed(&req.text).await?;
    Ok(Json(EmbeddingResponse {
        dimensions: embedding.len(),
        embedding,
    }))
}

/// Handler for `POST /v1/clauses/compare`
pub async fn compare_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ComparisonResult>> {
    let req: CompareRequest = parse_body(&body)?;
    info!(
        "Comparison request: clause={}, contract_text={} chars",
        req.clause_id,
        req.contract_text.len()
    );

    let result = state.service.compare(&req.contract_text, &req.clause_id).await?;
    Ok(Json(result))
}

/// Handler for `GET /v1/clauses`
pub async fn list_clauses_handler(State(state): State<AppState>) -> Json<Vec<ClauseSummary>> {
    Json(state.service.library().list())
}

/// Handler for `GET /admin/cache/stats`
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<ServiceStats> {
    Json(state.service.stats())
}

/// Handler for `POST /admin/cache/clear[?reset_metrics=true]`
pub async fn cache_clear_handler(
    State(state): State<AppState>,
    Query(params): Query<ClearParams>,
) -> Json<ClearResponse> {
    state.service.clear_caches(params.reset_metrics);

    Json(ClearResponse {
        status: "cleared".to_string(),
        metrics_reset: params.reset_metrics,
        stats: state.service.stats(),
    })
}

/// Handler for `GET /metrics` (Prometheus text format)
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}
