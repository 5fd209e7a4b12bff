//! Axum-based HTTP server for the clause-review service.
//!
//! This module sets up the HTTP server, configures routes, and exposes the
//! memoized review operations together with the cache administration
//! endpoints used by the web front-end and operators.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints (compare, embeddings, cache admin, health).
//! - `middleware`: Request ID propagation and per-route request metrics.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{ClearResponse, EmbeddingResponse, HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
