// clause-review - memoized AI clause comparison and embedding service
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use clause_review::cli::Args;
use clause_review::config::AppConfig;
use clause_review::library::ClauseLibrary;
use clause_review::providers::{HttpComparisonProvider, HttpEmbeddingProvider, ProviderClient};
use clause_review::review::ReviewService;
use clause_review::server::create_router;
use clause_review::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting clause-review v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers.max(1))
        .enable_all()
        .build()?;

    runtime.block_on(run(config))
}

async fn run(config: AppConfig) -> Result<()> {
    // Phase 3: Load clause library
    let library = ClauseLibrary::load(&config.library.path)?;
    info!("Clause library: {} clauses from {}", library.len(), config.library.path);

    // Phase 4: Build provider clients
    if config.provider.api_key.is_empty() {
        warn!("No provider API key configured; upstream calls will be unauthenticated");
    }
    let client = ProviderClient::new(&config.provider, config.performance.connection_pool_size)?;
    let embedder = HttpEmbeddingProvider::new(client.clone(), config.provider.embedding_model.clone());
    let comparator = HttpComparisonProvider::new(client, config.provider.comparison_model.clone());

    // Phase 5: Review service owns the caches for the life of the process
    let service = Arc::new(ReviewService::new(
        &config.cache,
        library,
        Arc::new(embedder),
        Arc::new(comparator),
    ));

    if config.cache.sweep_interval_seconds > 0 {
        spawn_expiry_sweep(Arc::clone(&service), Duration::from_secs(config.cache.sweep_interval_seconds));
    }

    // Phase 6: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, service)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 7: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Periodically drop expired cache entries so idle keys do not hold memory
fn spawn_expiry_sweep(service: Arc<ReviewService>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            service.purge_expired();
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
