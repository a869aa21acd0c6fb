//! Seeded random forest over binary features.
//!
//! Each tree is grown on a bootstrap sample with a random feature subset tried
//! at every split, using Gini impurity. Importance is mean decrease in
//! impurity, normalized per tree and averaged across the ensemble.
//!
//! Trees are fitted in parallel, each with its own RNG derived from the base
//! seed and the tree index, so results do not depend on thread scheduling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{AnalysisError, AnalysisResult};

/// Gains closer than this are treated as a tie.
const TIE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub max_features: usize,
    pub seed: u64,
    /// Node budget for the whole forest. Exceeding it aborts the fit.
    pub max_nodes: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf { p_win: f64 },
    Split { feature: usize, absent: usize, present: usize },
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { p_win } => return *p_win,
                Node::Split { feature, absent, present } => {
                    idx = if row[*feature] > 0.5 { *present } else { *absent };
                }
            }
        }
    }
}

struct FittedTree {
    tree: DecisionTree,
    importances: Vec<f64>,
    out_of_bag: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    importances: Vec<f64>,
    oob_accuracy: Option<f64>,
}

impl RandomForest {
    pub fn fit(rows: &[Vec<f64>], labels: &[bool], params: &ForestParams) -> AnalysisResult<Self> {
        if rows.is_empty() || rows.len() != labels.len() {
            return Err(AnalysisError::InsufficientData(format!(
                "{} rows for {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let n_features = rows[0].len();
        if n_features == 0 {
            return Err(AnalysisError::InsufficientData("no features".to_string()));
        }

        let per_tree_budget = (params.max_nodes / params.n_trees.max(1)).max(1);

        let fitted: Vec<FittedTree> = (0..params.n_trees)
            .into_par_iter()
            .map(|i| {
                let rng = StdRng::seed_from_u64(params.seed.wrapping_add(i as u64));
                grow_tree(rows, labels, n_features, params, per_tree_budget, rng)
            })
            .collect::<AnalysisResult<Vec<_>>>()?;

        let mut importances = vec![0.0; n_features];
        let mut informative = 0usize;
        for f in &fitted {
            let total: f64 = f.importances.iter().sum();
            if total > 0.0 {
                informative += 1;
                for (acc, v) in importances.iter_mut().zip(&f.importances) {
                    *acc += v / total;
                }
            }
        }
        if informative == 0 {
            return Err(AnalysisError::Computation(
                "no tree found an informative split".to_string(),
            ));
        }
        let sum: f64 = importances.iter().sum();
        for v in importances.iter_mut() {
            *v /= sum;
        }

        let oob_accuracy = out_of_bag_accuracy(rows, labels, &fitted);

        Ok(Self {
            trees: fitted.into_iter().map(|f| f.tree).collect(),
            importances,
            oob_accuracy,
        })
    }

    /// Normalized to sum to 1. Indexed like the input columns.
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    /// Fraction of samples classified correctly by the trees that did not see
    /// them. `None` when every sample was in every bootstrap.
    pub fn oob_accuracy(&self) -> Option<f64> {
        self.oob_accuracy
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean leaf win probability across trees.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        self.trees.iter().map(|t| t.predict(row)).sum::<f64>() / self.trees.len() as f64
    }
}

fn out_of_bag_accuracy(rows: &[Vec<f64>], labels: &[bool], fitted: &[FittedTree]) -> Option<f64> {
    let mut votes = vec![(0.0f64, 0usize); rows.len()];
    for f in fitted {
        for &i in &f.out_of_bag {
            votes[i].0 += f.tree.predict(&rows[i]);
            votes[i].1 += 1;
        }
    }

    let mut scored = 0usize;
    let mut correct = 0usize;
    for (i, (p_sum, n)) in votes.iter().enumerate() {
        if *n == 0 {
            continue;
        }
        scored += 1;
        if (p_sum / *n as f64 > 0.5) == labels[i] {
            correct += 1;
        }
    }
    (scored > 0).then(|| correct as f64 / scored as f64)
}

fn grow_tree(
    rows: &[Vec<f64>],
    labels: &[bool],
    n_features: usize,
    params: &ForestParams,
    node_budget: usize,
    mut rng: StdRng,
) -> AnalysisResult<FittedTree> {
    let n = rows.len();
    let mut in_bag = vec![false; n];
    let sample: Vec<usize> = (0..n)
        .map(|_| {
            let i = rng.gen_range(0..n);
            in_bag[i] = true;
            i
        })
        .collect();

    let mut builder = TreeBuilder {
        rows,
        labels,
        n_features,
        max_features: params.max_features.clamp(1, n_features),
        params,
        rng,
        nodes: Vec::new(),
        importances: vec![0.0; n_features],
        node_budget,
        root_size: n as f64,
    };
    builder.build(&sample, 0)?;

    Ok(FittedTree {
        tree: DecisionTree { nodes: builder.nodes },
        importances: builder.importances,
        out_of_bag: (0..n).filter(|&i| !in_bag[i]).collect(),
    })
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    labels: &'a [bool],
    n_features: usize,
    max_features: usize,
    params: &'a ForestParams,
    rng: StdRng,
    nodes: Vec<Node>,
    importances: Vec<f64>,
    node_budget: usize,
    root_size: f64,
}

impl TreeBuilder<'_> {
    fn build(&mut self, samples: &[usize], depth: usize) -> AnalysisResult<usize> {
        if self.nodes.len() >= self.node_budget {
            return Err(AnalysisError::Computation(format!(
                "tree exceeded node budget of {}",
                self.node_budget
            )));
        }

        let n = samples.len();
        let wins = samples.iter().filter(|&&i| self.labels[i]).count();
        let p_win = wins as f64 / n as f64;
        let impurity = gini(wins, n);

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { p_win });

        if depth >= self.params.max_depth || n < self.params.min_samples_split || impurity == 0.0 {
            return Ok(idx);
        }

        let mut candidates =
            rand::seq::index::sample(&mut self.rng, self.n_features, self.max_features).into_vec();
        candidates.sort_unstable();

        let mut best_gain = 0.0;
        let mut tied: Vec<usize> = Vec::new();
        for &f in &candidates {
            let (present_n, present_wins) = samples
                .iter()
                .filter(|&&i| self.rows[i][f] > 0.5)
                .fold((0usize, 0usize), |(c, w), &i| (c + 1, w + self.labels[i] as usize));
            let absent_n = n - present_n;
            if present_n == 0 || absent_n == 0 {
                continue;
            }
            let absent_wins = wins - present_wins;
            let child = (present_n as f64 * gini(present_wins, present_n)
                + absent_n as f64 * gini(absent_wins, absent_n))
                / n as f64;
            let gain = impurity - child;

            if gain > best_gain + TIE_EPSILON {
                best_gain = gain;
                tied.clear();
                tied.push(f);
            } else if (gain - best_gain).abs() <= TIE_EPSILON && gain > TIE_EPSILON {
                tied.push(f);
            }
        }

        let Some(&feature) = tied.first() else {
            return Ok(idx);
        };

        // Equally informative features share the credit so column order
        // does not decide which one looks important.
        let credit = (n as f64 / self.root_size) * best_gain / tied.len() as f64;
        for &f in &tied {
            self.importances[f] += credit;
        }

        let (present, absent): (Vec<usize>, Vec<usize>) =
            samples.iter().partition(|&&i| self.rows[i][feature] > 0.5);

        let absent_idx = self.build(&absent, depth + 1)?;
        let present_idx = self.build(&present, depth + 1)?;
        self.nodes[idx] = Node::Split {
            feature,
            absent: absent_idx,
            present: present_idx,
        };
        Ok(idx)
    }
}

fn gini(wins: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = wins as f64 / n as f64;
    2.0 * p * (1.0 - p)
}
