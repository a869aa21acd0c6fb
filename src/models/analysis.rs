use serde::{Deserialize, Serialize};

/// Aggregate performance over the full trade history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub win_rate: f64,
    /// Gross win over gross loss magnitude. Capped at the configured sentinel
    /// when there are winners but no losses; 0 with no trades.
    pub profit_factor: f64,
    pub average_win: f64,
    /// Non-negative magnitude.
    pub average_loss: f64,
    pub best_conditions: Vec<String>,
    pub pattern_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportantFactor {
    pub factor: String,
    pub importance: f64,
}

/// Factor ranking plus mined success patterns. Both lists are empty when the
/// history is too thin to analyze.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub important_factors: Vec<ImportantFactor>,
    pub success_patterns: Vec<String>,
}
