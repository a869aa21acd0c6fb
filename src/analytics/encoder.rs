use crate::error::{AnalysisError, AnalysisResult};
use crate::models::NormalizedTrade;

/// Multi-hot encoding of condition tags over the vocabulary observed in the
/// current trade set. Rebuilt on every call; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// Sorted, distinct tags. Column `j` of every row refers to `vocabulary[j]`.
    pub vocabulary: Vec<String>,
    pub rows: Vec<FeatureVector>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: Vec<f64>,
    pub label: bool,
}

impl FeatureMatrix {
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = bool> + '_ {
        self.rows.iter().map(|r| r.label)
    }
}

pub fn encode(trades: &[NormalizedTrade]) -> AnalysisResult<FeatureMatrix> {
    if trades.is_empty() {
        return Err(AnalysisError::InsufficientData("no trades to encode".to_string()));
    }

    let mut vocabulary: Vec<String> = trades
        .iter()
        .flat_map(|t| t.conditions.iter().cloned())
        .collect();
    vocabulary.sort();
    vocabulary.dedup();

    if vocabulary.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "no market conditions recorded on any trade".to_string(),
        ));
    }

    let rows = trades
        .iter()
        .map(|t| FeatureVector {
            values: vocabulary
                .iter()
                .map(|tag| if t.has_condition(tag) { 1.0 } else { 0.0 })
                .collect(),
            label: t.is_win,
        })
        .collect();

    Ok(FeatureMatrix { vocabulary, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::normalized_with_pnl;

    #[test]
    fn vocabulary_is_sorted_and_rows_are_fixed_width() {
        let trades = vec![
            normalized_with_pnl(1.0, &["zeta", "alpha"]),
            normalized_with_pnl(-1.0, &["mid"]),
            normalized_with_pnl(2.0, &[]),
        ];
        let m = encode(&trades).unwrap();
        assert_eq!(m.vocabulary, vec!["alpha", "mid", "zeta"]);
        assert_eq!(m.n_samples(), 3);
        assert!(m.rows.iter().all(|r| r.values.len() == 3));
        assert_eq!(m.rows[0].values, vec![1.0, 0.0, 1.0]);
        assert_eq!(m.rows[1].values, vec![0.0, 1.0, 0.0]);
        assert_eq!(m.rows[2].values, vec![0.0, 0.0, 0.0]);
        assert_eq!(m.labels().collect::<Vec<_>>(), vec![true, false, true]);
    }

    #[test]
    fn vocabulary_tracks_current_input() {
        let first = encode(&[normalized_with_pnl(1.0, &["a", "b"])]).unwrap();
        let second = encode(&[normalized_with_pnl(1.0, &["c"])]).unwrap();
        assert_eq!(first.vocabulary, vec!["a", "b"]);
        assert_eq!(second.vocabulary, vec!["c"]);
    }

    #[test]
    fn empty_inputs_are_insufficient() {
        assert!(matches!(encode(&[]), Err(AnalysisError::InsufficientData(_))));
        let untagged = vec![normalized_with_pnl(1.0, &[]), normalized_with_pnl(-1.0, &[])];
        assert!(matches!(
            encode(&untagged),
            Err(AnalysisError::InsufficientData(_))
        ));
    }
}
