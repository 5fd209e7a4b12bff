//! Structured logging and secret-redaction utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing a helper that keeps
//! provider API keys out of logs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{Result, ServiceError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Multi-line, colorized output for development.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let initialized = match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };

    initialized.map_err(|e| ServiceError::Internal(format!("Failed to initialize logging: {}", e)))
}

/// Replaces provider credentials in a log line with a `[REDACTED]` marker.
///
/// Handles `Bearer <token>` headers and OpenAI-style `sk-` keys, every
/// occurrence.
pub fn sanitize(input: &str) -> String {
    let result = redact_after(input, "Bearer ", "Bearer [REDACTED_TOKEN]");
    redact_after(&result, "sk-", "[REDACTED_API_KEY]")
}

/// Replace `marker` and the word following it with `replacement`.
fn redact_after(input: &str, marker: &str, replacement: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(marker) {
        let secret_start = pos + marker.len();

        // "task-1" is not a key: the marker must start a word
        let mid_word = rest[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric());
        if mid_word {
            output.push_str(&rest[..secret_start]);
            rest = &rest[secret_start..];
            continue;
        }

        let secret_len = rest[secret_start..]
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
            .unwrap_or(rest.len() - secret_start);

        output.push_str(&rest[..pos]);
        output.push_str(if secret_len == 0 { marker } else { replacement });
        rest = &rest[secret_start + secret_len..];
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_bearer_token() {
        let output = sanitize("Authorization: Bearer abc.def-123 sent");
        assert_eq!(output, "Authorization: Bearer [REDACTED_TOKEN] sent");
    }

    #[test]
    fn test_sanitize_api_key() {
        let output = sanitize(r#"{"api_key":"sk-proj-A1b2C3"}"#);
        assert!(output.contains("[REDACTED_API_KEY]"));
        assert!(!output.contains("A1b2C3"));
    }

    #[test]
    fn test_sanitize_every_occurrence() {
        let output = sanitize("sk-one and sk-two");
        assert_eq!(output, "[REDACTED_API_KEY] and [REDACTED_API_KEY]");
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize("cache hit for clause-1"), "cache hit for clause-1");
        assert_eq!(sanitize("risk-assessment task-7"), "risk-assessment task-7");
    }
}
