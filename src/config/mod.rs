// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{ServiceError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `CLAUSE_REVIEW_CACHE__COMPARISON_MAX_SIZE`.
pub const ENV_PREFIX: &str = "CLAUSE_REVIEW";

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. CLI arguments (highest, applied by the caller)
    /// 2. Environment variables
    /// 3. Config file (`path`, or `~/.clause-review/config.toml`)
    /// 4. Defaults (lowest)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            // An explicitly requested file must exist
            Some(p) => File::from(p.to_path_buf()).required(true),
            None => File::from(Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServiceError::Config(e.to_string()))
    }

    fn default_config_path() -> PathBuf {
        config_dir().join("config.toml")
    }
}

/// Directory holding the config file and the default clause library.
pub(crate) fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clause-review")
}
