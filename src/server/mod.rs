pub mod error;
pub mod routes;

pub use error::ApiError;

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::analytics::AnalyticsEngine;
use crate::journal::TradeJournal;
use crate::models::MarketCondition;

/// Shared request state. The engine is immutable; the condition catalog is
/// the only state owned by the service itself.
pub struct AppState {
    pub journal: Arc<dyn TradeJournal>,
    pub engine: Arc<AnalyticsEngine>,
    pub conditions: RwLock<Vec<MarketCondition>>,
}

impl AppState {
    pub fn new(journal: Arc<dyn TradeJournal>, engine: AnalyticsEngine) -> Self {
        Self {
            journal,
            engine: Arc::new(engine),
            conditions: RwLock::new(Vec::new()),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/trades/", get(routes::list_trades).post(routes::create_trade))
        .route(
            "/market-conditions/",
            get(routes::list_market_conditions).post(routes::create_market_condition),
        )
        .route("/analysis/performance", get(routes::analyze_performance))
        .route("/analysis/patterns", get(routes::analyze_patterns))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
