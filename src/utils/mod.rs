//! Utility functions and helpers for the clause-review service.
//!
//! This module provides cross-cutting concerns like structured logging,
//! secret redaction, retry logic with backoff, and text normalization.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and secret redaction.
//! - `retry`: Retry with backoff that respects `Retry-After` hints.
//! - `text`: Normalization applied before cache keys are derived.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
pub mod text;
