// clause-review - memoized AI clause comparison and embedding service
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod metrics;
pub mod providers;
pub mod review;
pub mod server;
pub mod utils;
