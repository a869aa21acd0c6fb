use chrono::{DateTime, Utc};
use trade_journal::models::TradeRecord;

/// Long AAPL record of size 1 whose P&L is exactly `pnl`.
pub fn trade(pnl: f64, tags: &[&str]) -> TradeRecord {
    let entry_time = DateTime::parse_from_rfc3339("2024-01-17T14:30:00Z")
        .unwrap()
        .with_timezone(&Utc);

    TradeRecord {
        id: None,
        entry_time: Some(entry_time),
        symbol: Some("AAPL".to_string()),
        entry_price: Some(1000.0),
        exit_price: Some(1000.0 + pnl),
        position_size: Some(1.0),
        direction: Some("long".to_string()),
        conditions: tags.iter().map(|t| t.to_string()).collect(),
        notes: String::new(),
    }
}

/// Two disjoint tags with mirrored outcomes: `alpha` wins and `beta` loses
/// in equal numbers.
pub fn symmetric_history(per_side: usize) -> Vec<TradeRecord> {
    let mut out = Vec::with_capacity(per_side * 2);
    for _ in 0..per_side {
        out.push(trade(50.0, &["alpha"]));
        out.push(trade(-50.0, &["beta"]));
    }
    out
}

/// Mixed history where `trend-up` drives wins and `high-vol` is a secondary
/// booster when combined with it.
pub fn mixed_history() -> Vec<TradeRecord> {
    let mut out = Vec::new();
    for i in 0..30 {
        match i % 5 {
            0 | 1 => out.push(trade(90.0, &["trend-up", "high-vol"])),
            2 => out.push(trade(-30.0, &["trend-up", "news"])),
            3 => out.push(trade(-60.0, &["range", "high-vol"])),
            _ => out.push(trade(20.0, &["range", "news"])),
        }
    }
    out
}
