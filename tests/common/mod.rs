// Shared fixtures for integration tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use clause_review::config::CacheConfig;
use clause_review::error::{Result, ServiceError};
use clause_review::library::{ClauseLibrary, LibraryClause};
use clause_review::providers::{
    ComparisonProvider, ComparisonResult, EmbeddingProvider, RiskLevel,
};
use clause_review::review::ReviewService;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Embedding provider that returns `[len(text), call_number]`.
#[derive(Default)]
pub struct CountingEmbedder {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::ServiceUnavailable("embedding backend down".to_string()));
        }
        Ok(vec![text.len() as f32, n as f32])
    }
}

/// Comparison provider whose summary is `R<call_number>`.
#[derive(Default)]
pub struct CountingComparator {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub seen_texts: parking_lot::Mutex<Vec<String>>,
}

#[async_trait]
impl ComparisonProvider for CountingComparator {
    async fn compare_clause(
        &self,
        contract_text: &str,
        clause: &LibraryClause,
    ) -> Result<ComparisonResult> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        // Suspend once so concurrent callers overlap
        tokio::task::yield_now().await;
        self.seen_texts.lock().push(contract_text.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Provider("Malformed comparison result".to_string()));
        }
        Ok(ComparisonResult {
            clause_id: clause.id.clone(),
            clause_version: clause.version,
            similarity: 0.75,
            risk_level: RiskLevel::Medium,
            deviations: vec![],
            summary: format!("R{}", n),
            recommendation: None,
        })
    }
}

pub fn library() -> ClauseLibrary {
    let clause = |id: &str, text: &str| LibraryClause {
        id: id.to_string(),
        title: id.to_uppercase(),
        category: "general".to_string(),
        version: 1,
        text: text.to_string(),
    };

    ClauseLibrary::new(vec![
        clause("clause-1", "Liability is capped at twelve months of fees."),
        clause("clause-2", "Either party may terminate on 30 days notice."),
    ])
    .unwrap()
}

pub fn cache_config(max_size: usize, ttl_seconds: u64) -> CacheConfig {
    CacheConfig {
        comparison_max_size: max_size,
        comparison_ttl_seconds: ttl_seconds,
        embedding_max_size: max_size,
        embedding_ttl_seconds: ttl_seconds,
        coalesce_inflight: false,
        sweep_interval_seconds: 0,
    }
}

pub struct Fixture {
    pub service: Arc<ReviewService>,
    pub embedder: Arc<CountingEmbedder>,
    pub comparator: Arc<CountingComparator>,
}

pub fn fixture(config: CacheConfig) -> Fixture {
    let embedder = Arc::new(CountingEmbedder::default());
    let comparator = Arc::new(CountingComparator::default());
    let service = Arc::new(ReviewService::new(
        &config,
        library(),
        embedder.clone(),
        comparator.clone(),
    ));

    Fixture {
        service,
        embedder,
        comparator,
    }
}
