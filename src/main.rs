use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use trade_journal::analytics::AnalyticsEngine;
use trade_journal::config::Config;
use trade_journal::journal;
use trade_journal::logging;
use trade_journal::server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    logging::init(&cfg.log_level);

    let journal = journal::from_config(&cfg);
    info!("Using {} trade journal", journal.name());

    let engine = AnalyticsEngine::new(cfg.analysis.clone());
    let app = build_router(Arc::new(AppState::new(journal, engine)));

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Trade journal API listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
