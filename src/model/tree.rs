//! CART decision tree over weighted samples, Gini impurity, binary labels.
//!
//! Nodes live in a flat arena (root at index 0) so that deep, fully grown trees
//! serialize without nesting.

use crate::error::TrainingError;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        /// Weighted fraction of failure samples reaching this leaf
        proba: f64,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Candidate features examined per split
    pub max_features: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: usize::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
    /// Impurity decrease per feature, normalized to sum to 1 (all zero for a stump)
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Fit on rows of `x` with per-row weights; rows with zero weight are ignored.
    pub fn fit(
        x: ArrayView2<'_, f64>,
        y: &[u8],
        weights: &[f64],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Result<Self, TrainingError> {
        if x.nrows() != y.len() || y.len() != weights.len() {
            return Err(TrainingError::ShapeMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        if let Some(&bad) = y.iter().find(|&&l| l > 1) {
            return Err(TrainingError::InvalidLabel(bad));
        }
        let indices: Vec<usize> = (0..y.len()).filter(|&i| weights[i] > 0.0).collect();
        if indices.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }

        let mut builder = Builder {
            x: x.view(),
            y,
            weights,
            params,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; x.ncols()],
        };
        builder.build(indices, 0);

        let Builder {
            nodes,
            mut importances,
            ..
        } = builder;
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }
        Ok(Self {
            nodes,
            n_features: x.ncols(),
            importances,
        })
    }

    /// Failure probability at the leaf this row lands in.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                TreeNode::Leaf { proba, .. } => return *proba,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    /// Check the arena a decoded tree will be walked through: children point
    /// forward and in range, split features exist, leaf probabilities are in [0, 1].
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        if self.importances.len() != self.n_features {
            return Err(format!(
                "tree has {} importances for {} features",
                self.importances.len(),
                self.n_features
            ));
        }
        let len = self.nodes.len();
        for (at, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { proba, .. } => {
                    if !(0.0..=1.0).contains(&proba) {
                        return Err(format!("node {at}: leaf probability {proba} outside [0, 1]"));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= self.n_features {
                        return Err(format!("node {at}: split on feature {feature} of {}", self.n_features));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {at}: non-finite threshold"));
                    }
                    for child in [left, right] {
                        if child <= at || child >= len {
                            return Err(format!("node {at}: child {child} outside ({at}, {len})"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], at: usize) -> usize {
            match &nodes[at] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

struct Builder<'a, 'r> {
    x: ArrayView2<'a, f64>,
    y: &'a [u8],
    weights: &'a [f64],
    params: &'a TreeParams,
    rng: &'r mut StdRng,
    nodes: Vec<TreeNode>,
    importances: Vec<f64>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    decrease: f64,
}

fn gini(w0: f64, w1: f64) -> f64 {
    let total = w0 + w1;
    if total <= 0.0 {
        return 0.0;
    }
    let (p0, p1) = (w0 / total, w1 / total);
    1.0 - p0 * p0 - p1 * p1
}

impl Builder<'_, '_> {
    fn class_weights(&self, indices: &[usize]) -> [f64; 2] {
        let mut w = [0.0; 2];
        for &i in indices {
            w[usize::from(self.y[i])] += self.weights[i];
        }
        w
    }

    fn leaf(&mut self, w: [f64; 2], n_samples: usize) -> usize {
        let total = w[0] + w[1];
        let proba = if total > 0.0 { w[1] / total } else { 0.0 };
        self.nodes.push(TreeNode::Leaf { proba, n_samples });
        self.nodes.len() - 1
    }

    fn build(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let n = indices.len();
        let w = self.class_weights(&indices);
        let impurity = gini(w[0], w[1]);

        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        if depth_reached
            || n < self.params.min_samples_split.max(2)
            || n < 2 * self.params.min_samples_leaf.max(1)
            || impurity <= f64::EPSILON
        {
            return self.leaf(w, n);
        }

        let Some(best) = self.find_split(&indices, w, impurity) else {
            return self.leaf(w, n);
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.x[[i, best.feature]] <= best.threshold);
        self.importances[best.feature] += best.decrease.max(0.0);

        let slot = self.nodes.len();
        self.nodes.push(TreeNode::Leaf {
            proba: 0.0,
            n_samples: n,
        });
        let left = self.build(left_idx, depth + 1);
        let right = self.build(right_idx, depth + 1);
        self.nodes[slot] = TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        slot
    }

    /// Visit features in random order until `max_features` non-constant ones have
    /// been examined; keep the split with the largest weighted impurity decrease.
    fn find_split(&mut self, indices: &[usize], w: [f64; 2], impurity: f64) -> Option<BestSplit> {
        let n_features = self.x.ncols();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total_w = w[0] + w[1];
        let parent = total_w * impurity;
        let order = index::sample(&mut *self.rng, n_features, n_features);

        let mut best: Option<BestSplit> = None;
        let mut visited = 0usize;
        let mut sorted = indices.to_vec();

        for feature in order.iter() {
            if visited >= self.params.max_features {
                break;
            }
            let x = self.x;
            sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
            let first = x[[sorted[0], feature]];
            let last = x[[sorted[sorted.len() - 1], feature]];
            if first == last {
                continue;
            }
            visited += 1;

            let mut left = [0.0f64; 2];
            for k in 0..sorted.len() - 1 {
                let i = sorted[k];
                left[usize::from(self.y[i])] += self.weights[i];
                let here = x[[i, feature]];
                let next = x[[sorted[k + 1], feature]];
                if here == next {
                    continue;
                }
                let n_left = k + 1;
                if n_left < min_leaf || sorted.len() - n_left < min_leaf {
                    continue;
                }
                let right = [w[0] - left[0], w[1] - left[1]];
                let child = (left[0] + left[1]) * gini(left[0], left[1])
                    + (right[0] + right[1]) * gini(right[0], right[1]);
                let decrease = parent - child;
                if best.as_ref().map_or(true, |b| decrease > b.decrease) {
                    let mut threshold = here + (next - here) / 2.0;
                    if threshold >= next {
                        threshold = here;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        decrease,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn gini_of_pure_and_even_nodes() {
        assert_eq!(gini(4.0, 0.0), 0.0);
        assert!((gini(2.0, 2.0) - 0.5).abs() < 1e-12);
        assert_eq!(gini(0.0, 0.0), 0.0);
    }

    #[test]
    fn separable_data_gives_pure_leaves() {
        let x = array![[0.0], [0.1], [0.2], [0.8], [0.9], [1.0]];
        let y = [0, 0, 0, 1, 1, 1];
        let w = [1.0; 6];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(x.view(), &y, &w, &TreeParams::default(), &mut rng).unwrap();
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_proba(&[0.05]), 0.0);
        assert_eq!(tree.predict_proba(&[0.95]), 1.0);
        assert_eq!(tree.importances(), &[1.0]);
    }

    #[test]
    fn weights_shift_leaf_probability() {
        // One feature value, so the root stays a leaf
        let x = array![[1.0], [1.0], [1.0], [1.0]];
        let y = [0, 0, 0, 1];
        let w = [1.0, 1.0, 1.0, 3.0];
        let mut rng = StdRng::seed_from_u64(1);
        let tree = DecisionTree::fit(x.view(), &y, &w, &TreeParams::default(), &mut rng).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert!((tree.predict_proba(&[1.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_rows_are_ignored() {
        let x = array![[0.0], [1.0]];
        let y = [0, 1];
        let w = [0.0, 2.0];
        let mut rng = StdRng::seed_from_u64(1);
        let tree = DecisionTree::fit(x.view(), &y, &w, &TreeParams::default(), &mut rng).unwrap();
        assert_eq!(tree.predict_proba(&[0.0]), 1.0);
    }

    #[test]
    fn max_depth_caps_growth() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = [0, 1, 0, 1, 0, 1];
        let w = [1.0; 6];
        let params = TreeParams {
            max_depth: Some(2),
            ..TreeParams::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let tree = DecisionTree::fit(x.view(), &y, &w, &params, &mut rng).unwrap();
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn fitted_tree_is_valid() {
        let x = array![[0.0, 5.0], [1.0, 4.0], [2.0, 3.0], [3.0, 2.0], [4.0, 1.0], [5.0, 0.0]];
        let y = [0, 1, 0, 1, 1, 0];
        let mut rng = StdRng::seed_from_u64(9);
        let tree = DecisionTree::fit(x.view(), &y, &[1.0; 6], &TreeParams::default(), &mut rng).unwrap();
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn backward_or_dangling_children_are_invalid() {
        let split = |left, right| TreeNode::Split {
            feature: 0,
            threshold: 0.5,
            left,
            right,
        };
        let leaf = TreeNode::Leaf {
            proba: 0.5,
            n_samples: 1,
        };
        let tree = |nodes| DecisionTree {
            nodes,
            n_features: 1,
            importances: vec![1.0],
        };
        assert!(tree(vec![split(0, 0)]).validate().is_err());
        assert!(tree(vec![split(1, 7), leaf.clone()]).validate().is_err());
        assert!(tree(vec![]).validate().is_err());
        assert!(tree(vec![TreeNode::Leaf {
            proba: 1.5,
            n_samples: 1
        }])
        .validate()
        .is_err());
        assert!(tree(vec![split(1, 2), leaf.clone(), leaf]).validate().is_ok());
    }

    #[test]
    fn all_zero_weights_is_empty() {
        let x = array![[0.0], [1.0]];
        let mut rng = StdRng::seed_from_u64(1);
        let err = DecisionTree::fit(x.view(), &[0, 1], &[0.0, 0.0], &TreeParams::default(), &mut rng)
            .unwrap_err();
        assert_eq!(err, TrainingError::EmptyTrainingSet);
    }
}
