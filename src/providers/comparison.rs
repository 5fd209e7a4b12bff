// Clause comparison via an OpenAI-compatible chat completion endpoint
// Author: kelexine (https://github.com/kelexine)

use super::{ComparisonProvider, ComparisonResult, ProviderClient, RiskLevel};
use crate::error::{Result, ServiceError};
use crate::library::LibraryClause;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a contract review assistant. Compare the contract text \
with the reference clause from the company's clause library. Respond with a JSON object with \
the keys: similarity (number from 0 to 1), risk_level (\"low\", \"medium\" or \"high\"), \
deviations (array of short strings describing material differences), summary (one paragraph), \
recommendation (string or null).";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: serde_json::Value,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// What the model is asked to return.
#[derive(Debug, Deserialize)]
struct Verdict {
    similarity: f32,
    risk_level: RiskLevel,
    #[serde(default)]
    deviations: Vec<String>,
    summary: String,
    #[serde(default)]
    recommendation: Option<String>,
}

pub struct HttpComparisonProvider {
    client: ProviderClient,
    model: String,
}

impl HttpComparisonProvider {
    pub fn new(client: ProviderClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn build_request<'a>(&'a self, contract_text: &str, clause: &LibraryClause) -> ChatRequest<'a> {
        let user_prompt = format!(
            "Reference clause \"{}\" (id {}, version {}):\n{}\n\nContract text:\n{}",
            clause.title, clause.id, clause.version, clause.text, contract_text
        );

        ChatRequest {
            model: &self.model,
            temperature: 0.0,
            response_format: json!({ "type": "json_object" }),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        }
    }
}

/// Turn the assistant message into a [`ComparisonResult`] for `clause`.
fn parse_verdict(content: &str, clause: &LibraryClause) -> Result<ComparisonResult> {
    // Some models wrap JSON in a fenced block despite the response format
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let verdict: Verdict = serde_json::from_str(trimmed)
        .map_err(|e| ServiceError::Provider(format!("Malformed comparison result: {}", e)))?;

    if !verdict.similarity.is_finite() {
        return Err(ServiceError::Provider("Comparison similarity is not a number".to_string()));
    }

    Ok(ComparisonResult {
        clause_id: clause.id.clone(),
        clause_version: clause.version,
        similarity: verdict.similarity.clamp(0.0, 1.0),
        risk_level: verdict.risk_level,
        deviations: verdict.deviations,
        summary: verdict.summary,
        recommendation: verdict.recommendation.filter(|r| !r.trim().is_empty()),
    })
}

#[async_trait]
impl ComparisonProvider for HttpComparisonProvider {
    async fn compare_clause(
        &self,
        contract_text: &str,
        clause: &LibraryClause,
    ) -> Result<ComparisonResult> {
        let request = self.build_request(contract_text, clause);
        let response: ChatResponse = self
            .client
            .post_json("Clause comparison", "/chat/completions", &request)
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ServiceError::Provider("Comparison response had no content".to_string()))?;

        debug!("Comparison verdict for {} ({} chars)", clause.id, content.len());
        parse_verdict(&content, clause)
    }
}
