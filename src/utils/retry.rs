// Retry logic for provider calls with Retry-After hint support
// Author: kelexine (https://github.com/kelexine)

use backoff::{backoff::Backoff, ExponentialBackoff};
use std::time::Duration;
use tracing::debug;

/// Longest server-suggested delay we are willing to honour
const MAX_HINTED_DELAY: Duration = Duration::from_secs(60);

/// A failed upstream attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamFailure {
    /// HTTP status; transport errors use 503, or 504 on timeout
    pub status: u16,
    pub body: String,
    /// Parsed `Retry-After` header, if the server sent one
    pub retry_after: Option<Duration>,
}

impl UpstreamFailure {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }
}

/// Parse a `Retry-After` value given in (possibly fractional) seconds.
/// Capped at 60 seconds. HTTP-date values are ignored.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(seconds).min(MAX_HINTED_DELAY))
}

/// Create exponential backoff configuration for retries
pub fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: Duration::from_millis(500),     // Start at 500ms
        initial_interval: Duration::from_millis(500),
        randomization_factor: 0.3,                         // Add jitter
        multiplier: 2.0,                                  // Double each time
        max_interval: Duration::from_secs(20),            // Cap at 20s
        max_elapsed_time: Some(Duration::from_secs(90)),  // Give up after 90s
        ..Default::default()
    }
}

/// Determine if an HTTP status code is retryable
pub fn is_retryable(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Execute an upstream operation with retry logic
/// - Uses the server's Retry-After hint if available
/// - Falls back to exponential backoff
/// - Stops after `max_attempts` (at least one attempt is always made)
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    max_attempts: u32,
    mut operation: F,
) -> Result<T, UpstreamFailure>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, UpstreamFailure>>,
{
    let mut backoff = create_backoff();
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(failure) => {
                if !is_retryable(failure.status) || attempt >= max_attempts {
                    return Err(failure);
                }

                let delay = match failure.retry_after {
                    Some(hint) => {
                        debug!(
                            "{} failed with {} (attempt {}), server asks to wait {}ms",
                            operation_name,
                            failure.status,
                            attempt,
                            hint.as_millis()
                        );
                        hint
                    }
                    None => {
                        let Some(backoff_delay) = backoff.next_backoff() else {
                            // max_elapsed_time reached
                            return Err(failure);
                        };
                        debug!(
                            "{} failed with {} (attempt {}), retrying after {}ms",
                            operation_name,
                            failure.status,
                            attempt,
                            backoff_delay.as_millis()
                        );
                        backoff_delay
                    }
                };

                tokio::time::sleep(delay).await;
            }
        }
    }
}
