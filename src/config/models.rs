//! Configuration data structures for the clause-review service.
//!
//! This module defines the schema for the application settings, including
//! server parameters, the AI provider connection, and cache sizing.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, workers).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream embedding/completion provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Memoization cache sizing and expiry.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Clause library source.
    #[serde(default)]
    pub library: LibraryConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Performance and resource management settings.
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads for the tokio runtime.
    /// Default: Number of logical CPU cores.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Settings for the OpenAI-compatible provider used for embeddings and comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider API (without the `/embeddings` suffix).
    /// Default: `https://api.openai.com/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token sent to the provider.
    #[serde(default)]
    pub api_key: ApiKey,

    /// Default: `text-embedding-3-small`
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Default: `gpt-4o-mini`
    #[serde(default = "default_comparison_model")]
    pub comparison_model: String,

    /// Request timeout in seconds.
    /// Default: `60`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of attempts for transient provider failures.
    /// Default: `3`
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Provider API key. Wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey([REDACTED])")
        }
    }
}

/// Sizing for the two memoization caches.
///
/// Values are fixed at construction; a size of zero disables the cache
/// without being an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default: `500`
    #[serde(default = "default_comparison_max_size")]
    pub comparison_max_size: usize,

    /// Default: `3600` (1 hour)
    #[serde(default = "default_comparison_ttl")]
    pub comparison_ttl_seconds: u64,

    /// Default: `1000`
    #[serde(default = "default_embedding_max_size")]
    pub embedding_max_size: usize,

    /// Default: `86400` (24 hours)
    #[serde(default = "default_embedding_ttl")]
    pub embedding_ttl_seconds: u64,

    /// Let concurrent misses for the same key wait on a single upstream call.
    /// Default: `false`
    #[serde(default)]
    pub coalesce_inflight: bool,

    /// Interval of the background sweep that drops expired entries; `0` disables it.
    /// Default: `300`
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

/// Where the clause library is loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Path to a TOML file with a `[[clauses]]` array.
    /// Default: `~/.clause-review/library.toml`
    #[serde(default = "default_library_path")]
    pub path: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Settings for tuning application performance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Maximum number of idle connections per host in the HTTP pool.
    /// Default: `32`
    #[serde(default = "default_pool_size")]
    pub connection_pool_size: usize,

    /// Whether to enable GZIP compression for HTTP responses.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enable_compression: bool,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: ApiKey::default(),
            embedding_model: default_embedding_model(),
            comparison_model: default_comparison_model(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            comparison_max_size: default_comparison_max_size(),
            comparison_ttl_seconds: default_comparison_ttl(),
            embedding_max_size: default_embedding_max_size(),
            embedding_ttl_seconds: default_embedding_ttl(),
            coalesce_inflight: false,
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            connection_pool_size: default_pool_size(),
            enable_compression: true,
        }
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_comparison_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_comparison_max_size() -> usize {
    500
}

fn default_comparison_ttl() -> u64 {
    3600 // 1 hour
}

fn default_embedding_max_size() -> usize {
    1000
}

fn default_embedding_ttl() -> u64 {
    86_400 // 24 hours
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_library_path() -> String {
    super::config_dir()
        .join("library.toml")
        .to_string_lossy()
        .to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_pool_size() -> usize {
    32
}
