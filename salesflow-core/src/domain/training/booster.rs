// salesflow-core/src/domain/training/booster.rs
//
// Gradient-boosted regression trees (squared error, second-order splits).

use ndarray::{Array1, Array2, ArrayView1};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    #[default]
    #[serde(rename = "reg:squarederror")]
    SquaredError,
}

/// Booster hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "kebab-case", default)]
pub struct GbtParams {
    #[validate(range(min = 1))]
    pub n_trees: usize,
    #[validate(range(min = 1))]
    pub max_depth: usize,
    #[validate(range(exclusive_min = 0.0))]
    pub learning_rate: f64,
    /// Fraction of rows drawn (without replacement) for each tree.
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub subsample: f64,
    /// Fraction of feature columns drawn for each tree.
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub colsample_bytree: f64,
    /// L2 penalty on leaf weights.
    #[validate(range(min = 0.0))]
    pub reg_lambda: f64,
    /// Minimum hessian sum on each side of a split.
    #[validate(range(min = 0.0))]
    pub min_child_weight: f64,
    pub objective: Objective,
    pub seed: u64,
}

impl Default for GbtParams {
    fn default() -> Self {
        Self {
            n_trees: 300,
            max_depth: 6,
            learning_rate: 0.05,
            subsample: 0.9,
            colsample_bytree: 0.9,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
            objective: Objective::SquaredError,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// One regression tree stored as a flat arena; node 0 is the root and
/// children always sit after their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".into());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                let child_ok = |c: usize| c > i && c < self.nodes.len();
                if *feature >= n_features
                    || !threshold.is_finite()
                    || !child_ok(*left)
                    || !child_ok(*right)
                {
                    return Err(format!("malformed split at node {i}"));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    grad: &'a [f64],
    hess: &'a [f64],
    features: &'a [usize],
    params: &'a GbtParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn leaf_weight(&self, g: f64, h: f64) -> f64 {
        -g / (h + self.params.reg_lambda) * self.params.learning_rate
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        g * g / (h + self.params.reg_lambda)
    }

    fn build(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value: 0.0 });

        let g: f64 = rows.iter().map(|&r| self.grad[r]).sum();
        let h: f64 = rows.iter().map(|&r| self.hess[r]).sum();

        let split = if depth < self.params.max_depth && rows.len() >= 2 {
            self.best_split(&rows, g, h)
        } else {
            None
        };

        match split {
            None => {
                self.nodes[idx] = Node::Leaf {
                    value: self.leaf_weight(g, h),
                };
            }
            Some(split) => {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .into_iter()
                    .partition(|&r| self.x[[r, split.feature]] < split.threshold);
                let left = self.build(left_rows, depth + 1);
                let right = self.build(right_rows, depth + 1);
                self.nodes[idx] = Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
            }
        }
        idx
    }

    /// Exact greedy search over the sampled features.
    fn best_split(&self, rows: &[usize], g: f64, h: f64) -> Option<Split> {
        let parent = self.score(g, h);
        let mut best: Option<Split> = None;
        let mut sorted = rows.to_vec();

        for &f in self.features {
            sorted.sort_by(|&a, &b| self.x[[a, f]].total_cmp(&self.x[[b, f]]));

            let (mut gl, mut hl) = (0.0, 0.0);
            for w in 0..sorted.len() - 1 {
                let r = sorted[w];
                gl += self.grad[r];
                hl += self.hess[r];

                let here = self.x[[r, f]];
                let next = self.x[[sorted[w + 1], f]];
                if here == next {
                    continue;
                }

                let (gr, hr) = (g - gl, h - hl);
                if hl < self.params.min_child_weight || hr < self.params.min_child_weight {
                    continue;
                }

                let gain = 0.5 * (self.score(gl, hl) + self.score(gr, hr) - parent);
                if gain > 1e-12 && best.is_none_or(|b| gain > b.gain) {
                    best = Some(Split {
                        feature: f,
                        threshold: here + (next - here) / 2.0,
                        gain,
                    });
                }
            }
        }
        best
    }
}

fn sample_count(ratio: f64, n: usize) -> usize {
    ((ratio * n as f64).floor() as usize).clamp(1, n)
}

/// Fitted ensemble: `base_score + sum(tree(x))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    params: GbtParams,
    n_features: usize,
    base_score: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedTrees {
    #[instrument(skip_all, fields(rows = x.nrows(), features = x.ncols()))]
    pub fn fit(params: &GbtParams, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self, DomainError> {
        let (n, d) = x.dim();
        if n == 0 {
            return Err(DomainError::Training("no training rows".into()));
        }
        if d == 0 {
            return Err(DomainError::Training("no feature columns".into()));
        }
        if y.len() != n {
            return Err(DomainError::Training(format!(
                "feature rows ({n}) and target length ({}) differ",
                y.len()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(DomainError::Training("non-finite value in training data".into()));
        }
        params
            .validate()
            .map_err(|e| DomainError::Training(format!("invalid booster parameters: {e}")))?;

        let base_score = y.mean().unwrap_or(0.0);
        let mut preds = vec![base_score; n];
        let hess = vec![1.0; n];
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for round in 0..params.n_trees {
            let grad: Vec<f64> = preds.iter().zip(y.iter()).map(|(p, t)| p - t).collect();

            let mut rows = index::sample(&mut rng, n, sample_count(params.subsample, n)).into_vec();
            rows.sort_unstable();
            let mut features =
                index::sample(&mut rng, d, sample_count(params.colsample_bytree, d)).into_vec();
            features.sort_unstable();

            let mut builder = TreeBuilder {
                x,
                grad: &grad,
                hess: &hess,
                features: &features,
                params,
                nodes: Vec::new(),
            };
            builder.build(rows, 0);
            let tree = RegressionTree {
                nodes: builder.nodes,
            };

            for (i, p) in preds.iter_mut().enumerate() {
                *p += tree.predict_row(x.row(i));
            }
            if round % 100 == 0 {
                debug!(round, leaves = tree.n_leaves(), "Boosting round");
            }
            trees.push(tree);
        }

        info!(trees = trees.len(), base_score, "Booster fitted");

        Ok(Self {
            params: params.clone(),
            n_features: d,
            base_score,
            trees,
        })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, DomainError> {
        if x.ncols() != self.n_features {
            return Err(DomainError::InvalidDataset(format!(
                "model expects {} features, got {}",
                self.n_features,
                x.ncols()
            )));
        }
        Ok(Array1::from_iter(x.rows().into_iter().map(|row| {
            self.base_score + self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>()
        })))
    }

    /// Structural sanity check for a deserialized model.
    pub fn check(&self) -> Result<(), DomainError> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features)
                .map_err(|e| DomainError::InvalidDataset(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }

    pub fn params(&self) -> &GbtParams {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        // y = 10 when x0 >= 5, else 0; x1 is noise
        let x = Array2::from_shape_fn((40, 2), |(r, c)| {
            if c == 0 { (r % 10) as f64 } else { ((r * 7) % 3) as f64 }
        });
        let y = Array1::from_shape_fn(40, |r| if r % 10 >= 5 { 10.0 } else { 0.0 });
        (x, y)
    }

    #[test]
    fn test_default_params() {
        let p = GbtParams::default();
        assert_eq!(p.n_trees, 300);
        assert_eq!(p.max_depth, 6);
        assert_eq!(p.learning_rate, 0.05);
        assert_eq!(p.subsample, 0.9);
        assert_eq!(p.colsample_bytree, 0.9);
        assert_eq!(p.objective, Objective::SquaredError);
        assert_eq!(p.seed, 42);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_fits_step_function() -> Result<()> {
        let (x, y) = step_data();
        let model = GradientBoostedTrees::fit(&GbtParams::default(), &x, &y)?;
        let pred = model.predict(&x)?;
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 0.5, "prediction {p} too far from {t}");
        }
        assert_eq!(model.n_trees(), 300);
        Ok(())
    }

    #[test]
    fn test_same_seed_same_model() -> Result<()> {
        let (x, y) = step_data();
        let params = GbtParams {
            n_trees: 20,
            ..GbtParams::default()
        };
        let a = GradientBoostedTrees::fit(&params, &x, &y)?;
        let b = GradientBoostedTrees::fit(&params, &x, &y)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_constant_target_predicts_constant() -> Result<()> {
        let x = Array2::from_shape_fn((6, 1), |(r, _)| r as f64);
        let y = Array1::from_elem(6, 3.0);
        let model = GradientBoostedTrees::fit(&GbtParams::default(), &x, &y)?;
        let pred = model.predict(&x)?;
        assert!(pred.iter().all(|p| (p - 3.0).abs() < 1e-9));
        Ok(())
    }

    #[test]
    fn test_rejects_bad_input() {
        let params = GbtParams::default();
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(GradientBoostedTrees::fit(&params, &empty, &Array1::zeros(0)).is_err());

        let x = Array2::<f64>::zeros((3, 2));
        assert!(GradientBoostedTrees::fit(&params, &x, &Array1::zeros(2)).is_err());

        let bad = GbtParams {
            learning_rate: 0.0,
            ..GbtParams::default()
        };
        assert!(GradientBoostedTrees::fit(&bad, &x, &Array1::zeros(3)).is_err());
    }

    #[test]
    fn test_predict_checks_width() -> Result<()> {
        let (x, y) = step_data();
        let params = GbtParams {
            n_trees: 5,
            ..GbtParams::default()
        };
        let model = GradientBoostedTrees::fit(&params, &x, &y)?;
        assert!(model.predict(&Array2::zeros((1, 3))).is_err());
        Ok(())
    }

    #[test]
    fn test_json_round_trip_keeps_predictions() -> Result<()> {
        let (x, y) = step_data();
        let params = GbtParams {
            n_trees: 10,
            ..GbtParams::default()
        };
        let model = GradientBoostedTrees::fit(&params, &x, &y)?;
        let json = serde_json::to_string(&model)?;
        assert!(json.contains("reg:squarederror"));
        let back: GradientBoostedTrees = serde_json::from_str(&json)?;
        back.check()?;
        let (a, b) = (back.predict(&x)?, model.predict(&x)?);
        assert!(a.iter().zip(b.iter()).all(|(p, q)| (p - q).abs() < 1e-9));
        Ok(())
    }
}
