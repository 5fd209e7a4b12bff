// Shared HTTP client for OpenAI-compatible provider endpoints
// Author: kelexine (https://github.com/kelexine)

use crate::config::{ApiKey, ProviderConfig};
use crate::error::{Result, ServiceError};
use crate::utils::logging::sanitize;
use crate::utils::retry::{parse_retry_after, with_retry, UpstreamFailure};
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// Pooled reqwest client bound to one provider base URL.
#[derive(Clone)]
pub struct ProviderClient {
    http_client: Client,
    base_url: String,
    api_key: ApiKey,
    max_retries: u32,
}

impl ProviderClient {
    pub fn new(config: &ProviderConfig, pool_size: usize) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created provider HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
        })
    }

    /// POST `body` to `{base_url}{path}` and decode the JSON response.
    ///
    /// Transient statuses are retried; a body that does not decode as `Resp`
    /// is reported as a provider error without retrying.
    pub async fn post_json<Req, Resp>(&self, operation: &str, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let request_id = format!("req_{}", uuid::Uuid::new_v4().simple());
        debug!("{} -> POST {} ({})", operation, url, request_id);

        let text = with_retry(operation, self.max_retries, || {
            let mut request = self
                .http_client
                .post(&url)
                .header("X-Client-Request-Id", request_id.as_str())
                .json(body);
            if !self.api_key.is_empty() {
                request = request.bearer_auth(self.api_key.expose());
            }

            async move {
                let response = request.send().await.map_err(transport_failure)?;
                let status = response.status();
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(parse_retry_after);

                let text = response.text().await.map_err(transport_failure)?;
                if !status.is_success() {
                    return Err(UpstreamFailure::new(status.as_u16(), text).with_retry_after(retry_after));
                }
                Ok(text)
            }
        })
        .await
        .map_err(|failure| {
            let body = sanitize(&failure.body);
            error!("{} failed: HTTP {} - {}", operation, failure.status, body);
            ServiceError::from_upstream(failure.status, body)
        })?;

        serde_json::from_str(&text).map_err(|e| {
            error!("{} returned an unreadable body: {}", operation, e);
            ServiceError::Provider(format!("Response parsing error: {}", e))
        })
    }
}

fn transport_failure(e: reqwest::Error) -> UpstreamFailure {
    let status = if e.is_timeout() { 504 } else { 503 };
    UpstreamFailure::new(status, format!("HTTP error: {}", e))
}
