use chrono::{DateTime, Utc};

use crate::analytics::normalizer::normalize;
use crate::models::{NormalizedTrade, TradeRecord};

fn entry_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T14:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Build a complete AAPL record.
pub fn record(entry: f64, exit: f64, size: f64, direction: &str, tags: &[&str]) -> TradeRecord {
    TradeRecord {
        id: None,
        entry_time: Some(entry_time()),
        symbol: Some("AAPL".to_string()),
        entry_price: Some(entry),
        exit_price: Some(exit),
        position_size: Some(size),
        direction: Some(direction.to_string()),
        conditions: tags.iter().map(|t| t.to_string()).collect(),
        notes: "test trade".to_string(),
    }
}

/// Long record of size 1 whose P&L is exactly `pnl`. `pnl` must exceed -1000.
pub fn record_with_pnl(pnl: f64, tags: &[&str]) -> TradeRecord {
    record(1000.0, 1000.0 + pnl, 1.0, "long", tags)
}

pub fn normalized_with_pnl(pnl: f64, tags: &[&str]) -> NormalizedTrade {
    normalize(0, &record_with_pnl(pnl, tags)).unwrap()
}
