//! memo-api server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use memo_api::config::StoreKind;
use memo_api::services::{MemoService, SummaryCache};
use memo_api::{build_router, telemetry, AppConfig, AppState};
use memo_core::{EventBus, MemoRepository};
use memo_db::{log_pool_metrics, Database, InMemoryMemoRepository, PoolConfig};
use memo_inference::{GeminiBackend, GeminiConfig, Summarizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let _log_guard = telemetry::init_tracing(&config.log);

    info!(
        log_format = ?config.log.format,
        log_file = config.log.file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // The generation credential is required at startup
    let gemini = GeminiConfig::from_env().context("Gemini backend is not configured")?;
    let backend = GeminiBackend::new(gemini)?;
    let summarizer = Summarizer::new(Arc::new(backend)).with_max_tags(config.max_tags);

    let repo: Arc<dyn MemoRepository> = match config.store {
        StoreKind::Postgres => {
            let pool_config =
                PoolConfig::new().max_connections(config.database_max_connections);
            let db = Database::connect_with_config(&config.database_url, pool_config)
                .await
                .context("failed to connect to database")?;
            db.migrate().await.context("failed to run migrations")?;
            log_pool_metrics(db.pool());
            Arc::new(db.memos)
        }
        StoreKind::Memory => {
            warn!(subsystem = "database", "Using in-memory memo store, data is lost on restart");
            Arc::new(InMemoryMemoRepository::new())
        }
    };

    let cache = SummaryCache::from_config(&config.cache).await;
    let events = Arc::new(EventBus::new(config.event_bus_capacity));
    let service = MemoService::new(repo, summarizer, cache, events);
    service.load().await.context("failed to load memos")?;

    let app = build_router(AppState::new(service), &config.cors_allowed_origins);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
