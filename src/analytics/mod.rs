//! Trade-journal analytics.
//!
//! ```text
//! TradeRecord[] -> normalizer -+-> aggregator ---------------------------+
//!                              |                                         +-> insights -> report
//!                              +-> encoder -> ranker -> pattern miner ---+
//! ```
//!
//! The two branches share nothing mutable and run concurrently. A thin or
//! one-sided history degrades the pattern branch to empty lists; only invalid
//! records fail the call.

pub mod aggregator;
pub mod encoder;
pub mod forest;
pub mod insights;
pub mod normalizer;
pub mod patterns;
pub mod ranker;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::models::{NormalizedTrade, PatternAnalysis, PerformanceMetrics, TradeRecord};

use aggregator::TradeSummary;
use insights::PatternFindings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub performance: PerformanceMetrics,
    pub patterns: PatternAnalysis,
}

/// Stateless apart from its configuration; safe to share across requests.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalysisConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, records: &[TradeRecord]) -> AnalysisResult<AnalysisReport> {
        let trades = normalizer::normalize_all(records)?;
        Ok(self.analyze_normalized(&trades))
    }

    pub fn performance(&self, records: &[TradeRecord]) -> AnalysisResult<PerformanceMetrics> {
        Ok(self.analyze(records)?.performance)
    }

    pub fn patterns(&self, records: &[TradeRecord]) -> AnalysisResult<PatternAnalysis> {
        Ok(self.analyze(records)?.patterns)
    }

    pub fn analyze_normalized(&self, trades: &[NormalizedTrade]) -> AnalysisReport {
        let (summary, findings) = rayon::join(
            || aggregator::aggregate(trades, &self.config),
            || self.find_patterns(trades),
        );

        let findings = match findings {
            Ok(f) => Some(f),
            Err(e) => {
                warn!("Pattern analysis degraded: {}", e);
                None
            }
        };

        let report = self.merge(&summary, findings.as_ref());
        info!(
            "Analyzed {} trades | WR {:.1}% | PF {:.2} | {} factors | {} patterns",
            summary.total_trades,
            report.performance.win_rate * 100.0,
            report.performance.profit_factor,
            report.patterns.important_factors.len(),
            report.patterns.success_patterns.len(),
        );
        report
    }

    fn find_patterns(&self, trades: &[NormalizedTrade]) -> AnalysisResult<PatternFindings> {
        let matrix = encoder::encode(trades)?;
        debug!(
            "Encoded {} trades over {} conditions",
            matrix.n_samples(),
            matrix.n_features()
        );
        let ranking = ranker::rank_factors(&matrix, &self.config)?;
        let patterns = patterns::mine_patterns(trades, &self.config);
        Ok(PatternFindings { ranking, patterns })
    }

    fn merge(&self, summary: &TradeSummary, findings: Option<&PatternFindings>) -> AnalysisReport {
        let mut performance = summary.metrics.clone();
        performance.pattern_insights = insights::render_insights(summary, findings, &self.config);

        let patterns = match findings {
            Some(f) => PatternAnalysis {
                important_factors: f.ranking.factors.clone(),
                success_patterns: f
                    .patterns
                    .iter()
                    .map(|p| p.describe(summary.overall_win_rate()))
                    .collect(),
            },
            None => PatternAnalysis::default(),
        };

        AnalysisReport {
            performance,
            patterns,
        }
    }
}
