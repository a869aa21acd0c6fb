use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::models::{NormalizedTrade, PerformanceMetrics};

/// Win/loss tally for one condition tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionStats {
    pub condition: String,
    pub total: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
}

/// Output of the aggregator: the metrics payload (without insights) plus the
/// figures the insight templates need.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
    pub metrics: PerformanceMetrics,
    pub total_trades: usize,
    pub wins: usize,
    pub total_pnl: f64,
    /// True when `profit_factor` is the cap sentinel (winners, no losses).
    pub profit_factor_capped: bool,
    pub best: Vec<ConditionStats>,
}

impl TradeSummary {
    pub fn overall_win_rate(&self) -> f64 {
        self.metrics.win_rate
    }
}

pub fn aggregate(trades: &[NormalizedTrade], cfg: &AnalysisConfig) -> TradeSummary {
    let total = trades.len();

    let wins: Vec<f64> = trades.iter().filter(|t| t.is_win).map(|t| t.pnl).collect();
    let losses: Vec<f64> = trades.iter().filter(|t| !t.is_win).map(|t| t.pnl.abs()).collect();

    let win_rate = if total > 0 {
        wins.len() as f64 / total as f64
    } else {
        0.0
    };

    let gross_win: f64 = wins.iter().sum();
    let gross_loss: f64 = losses.iter().sum();

    let average_win = mean(&wins);
    let average_loss = mean(&losses);

    let (profit_factor, profit_factor_capped) = if gross_loss > 0.0 {
        (gross_win / gross_loss, false)
    } else if !wins.is_empty() {
        (cfg.profit_factor_cap, true)
    } else {
        (0.0, false)
    };

    let best = best_conditions(&condition_stats(trades), cfg);

    TradeSummary {
        metrics: PerformanceMetrics {
            win_rate,
            profit_factor,
            average_win,
            average_loss,
            best_conditions: best.iter().map(|s| s.condition.clone()).collect(),
            pattern_insights: Vec::new(),
        },
        total_trades: total,
        wins: wins.len(),
        total_pnl: trades.iter().map(|t| t.pnl).sum(),
        profit_factor_capped,
        best,
    }
}

/// Per-tag stats, in tag order. A trade with N tags counts toward N groups.
pub fn condition_stats(trades: &[NormalizedTrade]) -> Vec<ConditionStats> {
    let mut buckets: BTreeMap<&str, (usize, usize, f64)> = BTreeMap::new();

    for t in trades {
        for c in &t.conditions {
            let entry = buckets.entry(c.as_str()).or_insert((0, 0, 0.0));
            entry.0 += 1;
            if t.is_win {
                entry.1 += 1;
            }
            entry.2 += t.pnl;
        }
    }

    buckets
        .into_iter()
        .map(|(condition, (total, wins, total_pnl))| ConditionStats {
            condition: condition.to_string(),
            total,
            wins,
            win_rate: wins as f64 / total as f64,
            total_pnl,
        })
        .collect()
}

/// Rank by win rate, then support, then name; keep tags with enough support.
pub fn best_conditions(stats: &[ConditionStats], cfg: &AnalysisConfig) -> Vec<ConditionStats> {
    let mut out: Vec<ConditionStats> = stats
        .iter()
        .filter(|s| s.total >= cfg.min_condition_support)
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then(b.total.cmp(&a.total))
            .then_with(|| a.condition.cmp(&b.condition))
    });
    out.truncate(cfg.top_conditions);
    out
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
