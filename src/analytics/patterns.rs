use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::warn;

use crate::config::AnalysisConfig;
use crate::models::NormalizedTrade;

/// A tag combination whose win rate beats the overall rate by the configured
/// margin with enough supporting trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessPattern {
    pub conditions: Vec<String>,
    pub support: usize,
    pub wins: usize,
    pub win_rate: f64,
}

impl SuccessPattern {
    pub fn describe(&self, overall_win_rate: f64) -> String {
        format!(
            "{}: {:.1}% win rate across {} trades (overall {:.1}%)",
            self.conditions.join(" + "),
            self.win_rate * 100.0,
            self.support,
            overall_win_rate * 100.0
        )
    }
}

/// Count every 2..=max_combo sized subset of each trade's tags and keep the
/// ones that skew toward wins. Ordered by win rate, then support, then tags.
pub fn mine_patterns(trades: &[NormalizedTrade], cfg: &AnalysisConfig) -> Vec<SuccessPattern> {
    if trades.is_empty() {
        return Vec::new();
    }

    let overall = trades.iter().filter(|t| t.is_win).count() as f64 / trades.len() as f64;
    let max_combo = admitted_combo_size(trades, cfg);

    let mut counts: BTreeMap<Vec<&str>, (usize, usize)> = BTreeMap::new();
    for t in trades {
        let tags: Vec<&str> = t.conditions.iter().map(String::as_str).collect();
        for size in 2..=max_combo.min(tags.len()) {
            for combo in combinations(&tags, size) {
                let entry = counts.entry(combo).or_insert((0, 0));
                entry.0 += 1;
                if t.is_win {
                    entry.1 += 1;
                }
            }
        }
    }

    let mut out: Vec<SuccessPattern> = counts
        .into_iter()
        .filter(|(_, (support, _))| *support >= cfg.pattern_min_support)
        .map(|(combo, (support, wins))| SuccessPattern {
            conditions: combo.into_iter().map(str::to_string).collect(),
            support,
            wins,
            win_rate: wins as f64 / support as f64,
        })
        .filter(|p| p.win_rate - overall >= cfg.pattern_margin)
        .collect();

    out.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then(b.support.cmp(&a.support))
            .then_with(|| a.conditions.cmp(&b.conditions))
    });
    out.truncate(cfg.pattern_limit);
    out
}

/// Largest combination size whose subsets, summed over all trades and all
/// smaller sizes, fit within `pattern_max_subsets`. Sizes are admitted whole
/// so every counted pattern sees every trade. Returns 1 when even pairs do
/// not fit, which disables mining.
fn admitted_combo_size(trades: &[NormalizedTrade], cfg: &AnalysisConfig) -> usize {
    let wanted = cfg.pattern_max_combo.max(2);
    let mut used = 0usize;
    let mut admitted = 1;
    for size in 2..=wanted {
        let needed = trades
            .iter()
            .fold(0usize, |acc, t| acc.saturating_add(binomial(t.conditions.len(), size)));
        used = used.saturating_add(needed);
        if used > cfg.pattern_max_subsets {
            warn!(
                "Pattern mining limited to {}-tag combinations ({} subsets would exceed budget of {})",
                admitted, used, cfg.pattern_max_subsets
            );
            break;
        }
        admitted = size;
    }
    admitted
}

/// C(n, k), saturating at `usize::MAX`.
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut c: u128 = 1;
    for i in 0..k {
        c = c * (n - i) as u128 / (i + 1) as u128;
        if c > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    c as usize
}

/// All `k`-element subsets of `items`, each in input order.
fn combinations<'a>(items: &[&'a str], k: usize) -> Vec<Vec<&'a str>> {
    let mut out = Vec::new();
    if k == 0 || k > items.len() {
        return out;
    }
    let mut current = Vec::with_capacity(k);
    collect_combinations(items, k, 0, &mut current, &mut out);
    out
}

fn collect_combinations<'a>(
    items: &[&'a str],
    k: usize,
    start: usize,
    current: &mut Vec<&'a str>,
    out: &mut Vec<Vec<&'a str>>,
) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    let remaining = k - current.len();
    for i in start..=items.len().saturating_sub(remaining) {
        current.push(items[i]);
        collect_combinations(items, k, i + 1, current, out);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::normalized_with_pnl;

    #[test]
    fn combinations_enumerates_subsets() {
        let items = ["a", "b", "c", "d"];
        assert_eq!(combinations(&items, 2).len(), 6);
        assert_eq!(combinations(&items, 3).len(), 4);
        assert_eq!(combinations(&items, 4), vec![vec!["a", "b", "c", "d"]]);
        assert_eq!(combinations(&items[..1], 2).len(), 0);
    }

    #[test]
    fn finds_winning_pair() {
        let mut trades = Vec::new();
        for _ in 0..4 {
            trades.push(normalized_with_pnl(10.0, &["breakout", "high-vol"]));
        }
        for _ in 0..4 {
            trades.push(normalized_with_pnl(-10.0, &["breakout"]));
        }
        trades.push(normalized_with_pnl(-10.0, &["high-vol", "news"]));
        trades.push(normalized_with_pnl(-10.0, &["high-vol", "news"]));
        trades.push(normalized_with_pnl(-10.0, &["high-vol", "news"]));

        let patterns = mine_patterns(&trades, &AnalysisConfig::default());
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.conditions, vec!["breakout", "high-vol"]);
        assert_eq!(p.support, 4);
        assert_eq!(p.win_rate, 1.0);
        assert!(p.describe(4.0 / 11.0).starts_with("breakout + high-vol: 100.0% win rate across 4 trades"));
    }

    #[test]
    fn respects_min_support() {
        let trades = vec![
            normalized_with_pnl(10.0, &["a", "b"]),
            normalized_with_pnl(10.0, &["a", "b"]),
            normalized_with_pnl(-10.0, &["c"]),
            normalized_with_pnl(-10.0, &["c"]),
        ];
        assert!(mine_patterns(&trades, &AnalysisConfig::default()).is_empty());
        let loose = AnalysisConfig {
            pattern_min_support: 2,
            ..AnalysisConfig::default()
        };
        assert_eq!(mine_patterns(&trades, &loose).len(), 1);
    }

    #[test]
    fn triples_only_when_enabled() {
        let trades: Vec<_> = (0..3)
            .map(|_| normalized_with_pnl(10.0, &["a", "b", "c"]))
            .chain((0..3).map(|_| normalized_with_pnl(-10.0, &["d"])))
            .collect();
        let pairs = mine_patterns(&trades, &AnalysisConfig::default());
        assert!(pairs.iter().all(|p| p.conditions.len() == 2));
        assert_eq!(pairs.len(), 3);

        let cfg = AnalysisConfig {
            pattern_max_combo: 3,
            ..AnalysisConfig::default()
        };
        let all = mine_patterns(&trades, &cfg);
        assert_eq!(all.len(), 4);
        assert!(all.iter().any(|p| p.conditions.len() == 3));
    }

    #[test]
    fn binomial_counts() {
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(10, 3), 120);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(200, 100), usize::MAX);
    }

    #[test]
    fn subset_budget_limits_combo_size() {
        let tags: Vec<String> = (0..30).map(|i| format!("t{:02}", i)).collect();
        let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let trades: Vec<_> = (0..4)
            .map(|_| normalized_with_pnl(10.0, &tag_refs))
            .chain((0..4).map(|_| normalized_with_pnl(-10.0, &["loser"])))
            .collect();

        // 4 trades x C(30, 2) = 1740 pairs; triples would add 4 x 4060 more.
        let cfg = AnalysisConfig {
            pattern_max_combo: 10,
            pattern_max_subsets: 5_000,
            pattern_limit: usize::MAX,
            ..AnalysisConfig::default()
        };
        assert_eq!(admitted_combo_size(&trades, &cfg), 2);
        let patterns = mine_patterns(&trades, &cfg);
        assert_eq!(patterns.len(), 435);
        assert!(patterns.iter().all(|p| p.conditions.len() == 2));

        let tight = AnalysisConfig {
            pattern_max_subsets: 100,
            ..cfg
        };
        assert!(mine_patterns(&trades, &tight).is_empty());
    }

    #[test]
    fn nothing_beats_overall_when_everything_wins() {
        let trades: Vec<_> = (0..6).map(|_| normalized_with_pnl(1.0, &["x", "y"])).collect();
        assert!(mine_patterns(&trades, &AnalysisConfig::default()).is_empty());
    }
}
