//! Upstream AI providers whose calls are memoized by the review service.
//!
//! Both operations are assumed idempotent for identical input, slow, and
//! occasionally failing. Timeouts and retries belong here, never to the cache.
//!
//! # Components
//!
//! - `client`: shared reqwest client with retry and error mapping.
//! - `embeddings`: OpenAI-compatible `/embeddings` client.
//! - `comparison`: chat-completion based clause comparison.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod client;
pub mod comparison;
pub mod embeddings;

pub use client::ProviderClient;
pub use comparison::HttpComparisonProvider;
pub use embeddings::HttpEmbeddingProvider;

use crate::error::Result;
use crate::library::LibraryClause;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generates a vector embedding for a piece of text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>>;
}

/// Compares contract text against a reference clause from the library.
#[async_trait]
pub trait ComparisonProvider: Send + Sync {
    async fn compare_clause(
        &self,
        contract_text: &str,
        clause: &LibraryClause,
    ) -> Result<ComparisonResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Structured outcome of comparing contract text with a library clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub clause_id: String,
    pub clause_version: u32,
    /// 0.0 (unrelated) to 1.0 (equivalent wording)
    pub similarity: f32,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub deviations: Vec<String>,
    pub summary: String,
    #[serde(default)]
    pub recommendation: Option<String>,
}
