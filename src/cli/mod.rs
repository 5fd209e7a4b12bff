// CLI module for clause-review
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;
use std::path::PathBuf;

/// clause-review - memoized AI clause comparison and embedding service
#[derive(Parser, Debug)]
#[command(name = "clause-review", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.clause-review/config.toml)
    #[arg(short, long, env = "CLAUSE_REVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the clause library file
    #[arg(long)]
    pub library: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut crate::config::AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(library) = &self.library {
            config.library.path = library.to_string_lossy().to_string();
        }
    }
}
