use tracing::debug;

use super::encoder::FeatureMatrix;
use super::forest::{ForestParams, RandomForest};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::ImportantFactor;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorRanking {
    /// Every vocabulary tag, most important first. Importances sum to 1.
    pub factors: Vec<ImportantFactor>,
    pub oob_accuracy: Option<f64>,
}

impl FactorRanking {
    pub fn top(&self) -> Option<&ImportantFactor> {
        self.factors.first()
    }
}

pub fn forest_params(cfg: &AnalysisConfig, n_features: usize) -> ForestParams {
    let default_features = (n_features as f64).sqrt().ceil() as usize;
    ForestParams {
        n_trees: cfg.forest_trees.max(1),
        max_depth: cfg.forest_max_depth,
        min_samples_split: cfg.forest_min_samples_split,
        max_features: cfg.forest_max_features.unwrap_or(default_features).max(1),
        seed: cfg.forest_seed,
        max_nodes: cfg.forest_max_nodes,
    }
}

/// Fit the ensemble and rank tags by how much they separate wins from losses.
/// Refuses tiny or single-class histories instead of inventing a ranking.
pub fn rank_factors(matrix: &FeatureMatrix, cfg: &AnalysisConfig) -> AnalysisResult<FactorRanking> {
    let n = matrix.n_samples();
    if n < cfg.min_trades_for_ranking {
        return Err(AnalysisError::InsufficientData(format!(
            "{} trades, need at least {}",
            n, cfg.min_trades_for_ranking
        )));
    }

    let wins = matrix.labels().filter(|&w| w).count();
    if wins == 0 || wins == n {
        return Err(AnalysisError::InsufficientData(
            "all trades share the same outcome".to_string(),
        ));
    }

    let rows: Vec<Vec<f64>> = matrix.rows.iter().map(|r| r.values.clone()).collect();
    let labels: Vec<bool> = matrix.labels().collect();
    let params = forest_params(cfg, matrix.n_features());

    let forest = RandomForest::fit(&rows, &labels, &params)?;

    let mut factors: Vec<ImportantFactor> = matrix
        .vocabulary
        .iter()
        .zip(forest.feature_importances())
        .map(|(tag, &importance)| ImportantFactor {
            factor: tag.clone(),
            importance,
        })
        .collect();
    factors.sort_by(|a, b| {
        b.importance
            .total_cmp(&a.importance)
            .then_with(|| a.factor.cmp(&b.factor))
    });

    debug!(
        "Ranked {} factors over {} trades ({} trees, oob accuracy {:?})",
        factors.len(),
        n,
        forest.n_trees(),
        forest.oob_accuracy()
    );

    Ok(FactorRanking {
        factors,
        oob_accuracy: forest.oob_accuracy(),
    })
}
