use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::{debug, info};

use crate::analytics::{normalizer, AnalysisReport};
use crate::models::{MarketCondition, PatternAnalysis, PerformanceMetrics, TradeRecord};
use crate::server::{ApiError, AppState};

/// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "AI Trading Journal API" }))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /trades/ -- validated before it reaches the journal
pub async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(record): Json<TradeRecord>,
) -> Result<Json<TradeRecord>, ApiError> {
    let trade = normalizer::normalize(0, &record)?;
    let stored = state
        .journal
        .record_trade(record)
        .await
        .map_err(ApiError::Journal)?;
    info!(
        "Recorded {} {} trade | P&L {:.2}",
        trade.symbol, trade.direction, trade.pnl
    );
    Ok(Json(stored))
}

/// GET /trades/
pub async fn list_trades(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TradeRecord>>, ApiError> {
    let records = state.journal.fetch_trades().await.map_err(ApiError::Journal)?;
    Ok(Json(records))
}

/// POST /market-conditions/
pub async fn create_market_condition(
    State(state): State<Arc<AppState>>,
    Json(condition): Json<MarketCondition>,
) -> Result<Json<MarketCondition>, ApiError> {
    let name = condition.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("market condition name is empty".into()));
    }
    let condition = MarketCondition {
        name: name.to_string(),
        description: condition.description,
    };
    state.conditions.write().await.push(condition.clone());
    Ok(Json(condition))
}

/// GET /market-conditions/
pub async fn list_market_conditions(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<MarketCondition>> {
    Json(state.conditions.read().await.clone())
}

/// GET /analysis/performance
pub async fn analyze_performance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PerformanceMetrics>, ApiError> {
    Ok(Json(run_analysis(&state).await?.performance))
}

/// GET /analysis/patterns
pub async fn analyze_patterns(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PatternAnalysis>, ApiError> {
    Ok(Json(run_analysis(&state).await?.patterns))
}

async fn run_analysis(state: &AppState) -> Result<AnalysisReport, ApiError> {
    let records = state.journal.fetch_trades().await.map_err(ApiError::Journal)?;
    debug!("Analyzing {} records from {} journal", records.len(), state.journal.name());

    let engine = state.engine.clone();
    let report = tokio::task::spawn_blocking(move || engine.analyze(&records))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {}", e)))??;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsEngine;
    use crate::journal::MemoryJournal;
    use crate::server::build_router;
    use crate::test_helpers::{record, record_with_pnl};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    fn app_with(records: Vec<TradeRecord>) -> Router {
        let journal = Arc::new(MemoryJournal::with_records(records));
        build_router(Arc::new(AppState::new(journal, AnalyticsEngine::default())))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_and_health() {
        let (status, body) = get_json(app_with(vec![]), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "AI Trading Journal API");

        let (_, body) = get_json(app_with(vec![]), "/health").await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn performance_on_empty_journal() {
        let (status, body) = get_json(app_with(vec![]), "/analysis/performance").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["win_rate"], 0.0);
        assert_eq!(body["profit_factor"], 0.0);
        assert_eq!(body["best_conditions"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn performance_three_trades() {
        let records = vec![
            record(100.0, 110.0, 1.0, "long", &["trend-up"]),
            record(100.0, 90.0, 1.0, "long", &["trend-up"]),
            record(100.0, 90.0, 1.0, "short", &["range"]),
        ];
        let (status, body) = get_json(app_with(records), "/analysis/performance").await;
        assert_eq!(status, StatusCode::OK);
        let wr = body["win_rate"].as_f64().unwrap();
        assert!((wr - 2.0 / 3.0).abs() < 1e-9);
        let pf = body["profit_factor"].as_f64().unwrap();
        assert!((pf - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn invalid_stored_record_is_422() {
        let records = vec![record(100.0, 110.0, -1.0, "long", &["a"])];
        let (status, body) = get_json(app_with(records), "/analysis/patterns").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("position_size"));
    }

    #[tokio::test]
    async fn patterns_degrade_on_thin_history() {
        let records = (0..3).map(|_| record_with_pnl(5.0, &["a"])).collect();
        let (status, body) = get_json(app_with(records), "/analysis/patterns").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["important_factors"], serde_json::json!([]));
        assert_eq!(body["success_patterns"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn create_trade_validates_then_stores() {
        let app = app_with(vec![]);
        let bad = serde_json::json!({
            "symbol": "AAPL",
            "entry_price": 100.0,
            "exit_price": 105.0,
            "position_size": 1.0,
            "direction": "sideways"
        });
        let (status, _) = post_json(app.clone(), "/trades/", bad).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let good = serde_json::to_value(record(100.0, 105.0, 2.0, "long", &["Trend-Up"])).unwrap();
        let (status, body) = post_json(app.clone(), "/trades/", good).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "AAPL");

        let (_, list) = get_json(app, "/trades/").await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn market_condition_catalog() {
        let app = app_with(vec![]);
        let (status, _) = post_json(
            app.clone(),
            "/market-conditions/",
            serde_json::json!({ "name": "  " }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = post_json(
            app.clone(),
            "/market-conditions/",
            serde_json::json!({ "name": " trend-up ", "description": "higher highs" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "trend-up");

        let (_, list) = get_json(app, "/market-conditions/").await;
        assert_eq!(list[0]["description"], "higher highs");
    }
}
