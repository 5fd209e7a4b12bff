// Embedding generation via an OpenAI-compatible /embeddings endpoint
// Author: kelexine (https://github.com/kelexine)

use super::{EmbeddingProvider, ProviderClient};
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

pub struct HttpEmbeddingProvider {
    client: ProviderClient,
    model: String,
}

impl HttpEmbeddingProvider {
    pub fn new(client: ProviderClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response: EmbeddingResponse = self
            .client
            .post_json("Embedding", "/embeddings", &request)
            .await?;

        let embedding = response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ServiceError::Provider("Embedding response contained no vector".to_string()))?;

        Ok(embedding)
    }
}
