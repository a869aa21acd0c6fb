use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Direction;

/// A trade as captured by the journal. Every field is optional on the wire so
/// that a missing value surfaces as a validation error naming the field
/// rather than an opaque deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "entry_date")]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub position_size: Option<f64>,
    #[serde(default, alias = "trade_type")]
    pub direction: Option<String>,
    #[serde(default, alias = "market_conditions")]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// Canonical form of a validated [`TradeRecord`]. `pnl` and `is_win` are
/// derived once at normalization and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTrade {
    pub entry_time: DateTime<Utc>,
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub position_size: f64,
    pub direction: Direction,
    /// Trimmed, lower-cased, deduplicated and sorted.
    pub conditions: Vec<String>,
    pub notes: String,
    pub pnl: f64,
    pub is_win: bool,
}

impl NormalizedTrade {
    pub fn has_condition(&self, tag: &str) -> bool {
        self.conditions.binary_search_by(|c| c.as_str().cmp(tag)).is_ok()
    }
}

/// Named market condition offered to the capture form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCondition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
