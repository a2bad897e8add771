//! Random forest regressor
//!
//! Bagged CART trees grown on bootstrap samples with variance-reduction
//! splits, exported as flat node arrays for `Estimator::Forest`. Nodes are
//! emitted in preorder so every child index is greater than its parent's.
//!
//! Each tree seeds its own RNG from (seed, tree index), so the fitted forest
//! is identical however Rayon schedules the work.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use crate::scorer::{RegressionTree, TreeNode};

/// Minimum variance reduction worth a split
const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// Root is depth 0
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Fitted forest plus impurity-based feature importance
#[derive(Debug, Clone)]
pub struct ForestFit {
    pub trees: Vec<RegressionTree>,
    /// Mean decrease in squared error per feature, sums to 1
    pub importance: Vec<f64>,
}

impl ForestFit {
    pub fn predict(&self, x: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        total / self.trees.len() as f64
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    params: &'a ForestParams,
    nodes: Vec<TreeNode>,
    importance: Vec<f64>,
}

impl<'a> TreeBuilder<'a> {
    fn new(x: &'a [Vec<f64>], y: &'a [f64], params: &'a ForestParams) -> Self {
        Self {
            x,
            y,
            params,
            nodes: Vec::new(),
            importance: vec![0.0; x[0].len()],
        }
    }

    /// Grow the subtree over `samples`, returning its root index
    fn grow(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let idx = self.nodes.len();
        let n = samples.len() as f64;
        let sum: f64 = samples.iter().map(|&i| self.y[i]).sum();
        let sum_sq: f64 = samples.iter().map(|&i| self.y[i] * self.y[i]).sum();
        let sse = (sum_sq - sum * sum / n).max(0.0);

        self.nodes.push(TreeNode::Leaf { leaf: sum / n });

        if depth >= self.params.max_depth
            || samples.len() < self.params.min_samples_split
            || sse <= MIN_GAIN
        {
            return idx;
        }
        let Some(split) = self.best_split(samples, sse) else {
            return idx;
        };

        // In-place partition: left block holds x[feature] <= threshold
        let mut mid = 0;
        for i in 0..samples.len() {
            if self.x[samples[i]][split.feature] <= split.threshold {
                samples.swap(i, mid);
                mid += 1;
            }
        }

        self.importance[split.feature] += split.gain;
        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);

        self.nodes[idx] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    /// Exhaustive search over sorted values of every feature
    fn best_split(&self, samples: &[usize], parent_sse: f64) -> Option<Split> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total: f64 = samples.iter().map(|&i| self.y[i]).sum();
        let total_sq: f64 = samples.iter().map(|&i| self.y[i] * self.y[i]).sum();

        let mut best: Option<Split> = None;
        let mut order = samples.to_vec();

        for feature in 0..self.importance.len() {
            order.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let y = self.y[order[k - 1]];
                left_sum += y;
                left_sq += y * y;

                let lo = self.x[order[k - 1]][feature];
                let hi = self.x[order[k]][feature];
                if lo == hi || k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let (nl, nr) = (k as f64, (n - k) as f64);
                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let sse_left = (left_sq - left_sum * left_sum / nl).max(0.0);
                let sse_right = (right_sq - right_sum * right_sum / nr).max(0.0);
                let gain = parent_sse - sse_left - sse_right;

                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    // Midpoint can round up onto `hi` for adjacent floats
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(Split { feature, threshold, gain });
                }
            }
        }
        best
    }
}

fn normalized(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter().map(|v| v / total).collect()
    } else {
        vec![0.0; values.len()]
    }
}

/// Fit a bagged regression forest on rows of `x` against `y`
pub fn fit_forest(x: &[Vec<f64>], y: &[f64], params: &ForestParams, seed: u64) -> Result<ForestFit> {
    if x.is_empty() || x.len() != y.len() {
        bail!("need matching non-empty X ({} rows) and y ({} rows)", x.len(), y.len());
    }
    let p = x[0].len();
    if p == 0 || x.iter().any(|row| row.len() != p) {
        bail!("ragged or empty feature matrix");
    }
    if params.n_estimators == 0 {
        bail!("forest needs at least one tree");
    }
    if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
        bail!("training data contains non-finite values");
    }

    let n = x.len();
    let grown: Vec<(RegressionTree, Vec<f64>)> = (0..params.n_estimators)
        .into_par_iter()
        .map(|t| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(t as u64));
            let mut samples: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut builder = TreeBuilder::new(x, y, params);
            builder.grow(&mut samples, 0);
            let importance = normalized(&builder.importance);
            (RegressionTree { nodes: builder.nodes }, importance)
        })
        .collect();

    let mut importance = vec![0.0; p];
    for (_, tree_importance) in &grown {
        for (total, v) in importance.iter_mut().zip(tree_importance) {
            *total += v;
        }
    }
    let importance = normalized(&importance);
    let trees: Vec<RegressionTree> = grown.into_iter().map(|(tree, _)| tree).collect();

    tracing::debug!(
        "Grew {} trees ({} nodes total)",
        trees.len(),
        trees.iter().map(|t| t.nodes.len()).sum::<usize>()
    );

    Ok(ForestFit { trees, importance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small_params(n_estimators: usize) -> ForestParams {
        ForestParams { n_estimators, ..ForestParams::default() }
    }

    /// y steps from 10 to 60 at x0 = 100; x1 is noise
    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..80)
            .map(|i| vec![i as f64 * 2.5, ((i * 7) % 13) as f64])
            .collect();
        let y = x.iter().map(|r| if r[0] <= 100.0 { 10.0 } else { 60.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_single_tree_recovers_step() {
        let (x, y) = step_data();
        let fit = fit_forest(&x, &y, &small_params(1), 7).unwrap();

        let root = &fit.trees[0].nodes[0];
        assert!(matches!(root, TreeNode::Split { feature: 0, .. }), "{:?}", root);
        assert_relative_eq!(fit.predict(&[20.0, 3.0]), 10.0, epsilon = 1e-9);
        assert_relative_eq!(fit.predict(&[180.0, 3.0]), 60.0, epsilon = 1e-9);
        assert_relative_eq!(fit.importance[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = step_data();
        let a = fit_forest(&x, &y, &small_params(16), 42).unwrap();
        let b = fit_forest(&x, &y, &small_params(16), 42).unwrap();
        assert_eq!(a.trees, b.trees);
        assert_eq!(a.importance, b.importance);
    }

    #[test]
    fn test_children_point_forward() {
        let x: Vec<Vec<f64>> = (0..60).map(|i| vec![i as f64, (i % 5) as f64]).collect();
        let y: Vec<f64> = x.iter().map(|r| r[0] * 0.5 + r[1]).collect();
        let fit = fit_forest(&x, &y, &small_params(4), 1).unwrap();

        for tree in &fit.trees {
            for (i, node) in tree.nodes.iter().enumerate() {
                if let TreeNode::Split { left, right, .. } = node {
                    assert!(*left > i && *right > i);
                    assert!(*left < tree.nodes.len() && *right < tree.nodes.len());
                }
            }
        }
    }

    #[test]
    fn test_depth_and_leaf_limits() {
        let (x, y) = step_data();
        let stump = ForestParams { n_estimators: 3, max_depth: 1, ..ForestParams::default() };
        let fit = fit_forest(&x, &y, &stump, 3).unwrap();
        assert!(fit.trees.iter().all(|t| t.nodes.len() <= 3));

        let leafy = ForestParams { n_estimators: 1, min_samples_leaf: 100, ..ForestParams::default() };
        let fit = fit_forest(&x, &y, &leafy, 3).unwrap();
        assert_eq!(fit.trees[0].nodes.len(), 1);
        assert_eq!(fit.importance, vec![0.0, 0.0]);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(fit_forest(&[], &[], &small_params(1), 0).is_err());
        assert!(fit_forest(&[vec![1.0]], &[1.0, 2.0], &small_params(1), 0).is_err());
        assert!(fit_forest(&[vec![f64::NAN]], &[1.0], &small_params(1), 0).is_err());
        assert!(fit_forest(&[vec![1.0]], &[1.0], &small_params(0), 0).is_err());
    }
}
