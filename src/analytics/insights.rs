use super::aggregator::TradeSummary;
use super::patterns::SuccessPattern;
use super::ranker::FactorRanking;
use crate::config::AnalysisConfig;

pub const INSUFFICIENT_HISTORY: &str = "insufficient trade history for pattern analysis";

/// Output of the encoder -> ranker -> miner pipeline when it has enough data.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternFindings {
    pub ranking: FactorRanking,
    pub patterns: Vec<SuccessPattern>,
}

/// Fixed sentence templates over the computed figures. Ordered: predictor
/// (or the degraded notice), best condition, profit factor.
pub fn render_insights(
    summary: &TradeSummary,
    findings: Option<&PatternFindings>,
    cfg: &AnalysisConfig,
) -> Vec<String> {
    let mut out = Vec::new();

    match findings.and_then(|f| f.ranking.top()) {
        Some(top) => out.push(format!(
            "Strongest predictor of winning trades: {} (importance {:.2})",
            top.factor, top.importance
        )),
        None => out.push(INSUFFICIENT_HISTORY.to_string()),
    }

    if let Some(best) = summary.best.first() {
        out.push(format!(
            "Best win rate in {}: {:.1}% over {} trades",
            best.condition,
            best.win_rate * 100.0,
            best.total
        ));
    }

    if summary.total_trades > 0 {
        if summary.profit_factor_capped {
            out.push(format!(
                "No losing trades yet; profit factor reported at the {:.0} cap",
                cfg.profit_factor_cap
            ));
        } else {
            out.push(format!(
                "Profit factor of {:.2} across {} trades ({} wins)",
                summary.metrics.profit_factor, summary.total_trades, summary.wins
            ));
        }
    }

    out
}
