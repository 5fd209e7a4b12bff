// Review service: memoized embedding and clause comparison
// Author: kelexine (https://github.com/kelexine)

use crate::cache::{comparison_key, embedding_key, CacheStats, Memoized, OperationKind};
use crate::config::CacheConfig;
use crate::error::{Result, ServiceError};
use crate::library::{ClauseLibrary, LibraryClause};
use crate::metrics::MetricsSnapshot;
use crate::providers::{ComparisonProvider, ComparisonResult, EmbeddingProvider};
use crate::utils::text::normalize;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Response body of the cache stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    pub comparison_cache: CacheStats,
    pub embedding_cache: CacheStats,
    pub metrics: MetricsSnapshot,
}

/// Owns the process-wide memoization caches in front of the AI providers.
///
/// Build one per process and share it behind an `Arc`.
pub struct ReviewService {
    library: ClauseLibrary,
    embedder: Arc<dyn EmbeddingProvider>,
    comparator: Arc<dyn ComparisonProvider>,
    embeddings: Memoized<Vec<f32>>,
    comparisons: Memoized<ComparisonResult>,
}

impl ReviewService {
    pub fn new(
        config: &CacheConfig,
        library: ClauseLibrary,
        embedder: Arc<dyn EmbeddingProvider>,
        comparator: Arc<dyn ComparisonProvider>,
    ) -> Self {
        info!(
            "Caches: comparison max={} ttl={}s, embedding max={} ttl={}s, coalescing={}",
            config.comparison_max_size,
            config.comparison_ttl_seconds,
            config.embedding_max_size,
            config.embedding_ttl_seconds,
            config.coalesce_inflight
        );

        Self {
            library,
            embedder,
            comparator,
            embeddings: Memoized::new(
                OperationKind::Embedding,
                config.embedding_max_size,
                Duration::from_secs(config.embedding_ttl_seconds),
            )
            .with_coalescing(config.coalesce_inflight),
            comparisons: Memoized::new(
                OperationKind::Comparison,
                config.comparison_max_size,
                Duration::from_secs(config.comparison_ttl_seconds),
            )
            .with_coalescing(config.coalesce_inflight),
        }
    }

    /// Embedding of `text`, memoized on its normalized form.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let normalized = non_empty(normalize(text), "text")?;
        let key = embedding_key(&normalized);

        self.embeddings
            .call(key, || async {
                self.embedder.generate_embedding(&normalized).await
            })
            .await
    }

    /// Compare `contract_text` against library clause `clause_id`, memoized
    /// on (clause id, normalized text).
    pub async fn compare(&self, contract_text: &str, clause_id: &str) -> Result<ComparisonResult> {
        let clause = self.clause(clause_id)?;
        let normalized = non_empty(normalize(contract_text), "contract_text")?;
        let key = comparison_key(&clause.id, &normalized);

        self.comparisons
            .call(key, || async {
                self.comparator.compare_clause(&normalized, clause).await
            })
            .await
    }

    fn clause(&self, clause_id: &str) -> Result<&LibraryClause> {
        let clause_id = clause_id.trim();
        if clause_id.is_empty() {
            return Err(ServiceError::InvalidRequest("clause_id must not be empty".to_string()));
        }
        self.library
            .get(clause_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Unknown library clause: {}", clause_id)))
    }

    pub fn library(&self) -> &ClauseLibrary {
        &self.library
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            comparison_cache: self.comparisons.cache_stats(),
            embedding_cache: self.embeddings.cache_stats(),
            metrics: self.metrics(),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::from_operations(self.comparisons.metrics(), self.embeddings.metrics())
    }

    /// Empty both caches; zero the counters too when `reset_metrics` is set.
    pub fn clear_caches(&self, reset_metrics: bool) {
        self.comparisons.clear(reset_metrics);
        self.embeddings.clear(reset_metrics);
        info!("Caches cleared (metrics reset: {})", reset_metrics);
    }

    /// Drop expired entries from both caches. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let removed = self.comparisons.cache().purge_expired() + self.embeddings.cache().purge_expired();
        if removed > 0 {
            debug!("Purged {} expired cache entries", removed);
        }
        removed
    }
}

fn non_empty(text: String, field: &str) -> Result<String> {
    if text.is_empty() {
        return Err(ServiceError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(text)
}
