use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::ModelError;
use super::linear::check_input;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Random forest hyper-parameters.
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    /// Features tried per split; `None` means `sqrt(n_features)`.
    pub max_features: Option<usize>,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_features: None,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

// ---------------------------------------------------------------------------
// Trees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Fraction of positive training samples that reached this leaf.
        positive: f64,
    },
}

/// A CART classification tree stored as a flat node list; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { positive } => return *positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Children must point forward so traversal always terminates.
    fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Corrupt("empty tree".into()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let in_range = |child: usize| child > idx && child < self.nodes.len();
                    if *feature >= n_features || !threshold.is_finite() {
                        return Err(ModelError::Corrupt(format!("node {idx}: bad split")));
                    }
                    if !in_range(*left) || !in_range(*right) {
                        return Err(ModelError::Corrupt(format!("node {idx}: bad child")));
                    }
                }
                Node::Leaf { positive } => {
                    if !(0.0..=1.0).contains(positive) {
                        return Err(ModelError::Corrupt(format!("node {idx}: bad leaf")));
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Forest
// ---------------------------------------------------------------------------

/// Bagged CART classifier with mean-decrease-impurity importances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
    /// Global importance per schema slot, non-negative, summing to 1 unless
    /// every tree is a single leaf.
    pub feature_importances: Vec<f64>,
}

impl RandomForest {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean positive-class probability across trees.
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_input(features, self.n_features)?;
        if self.trees.is_empty() {
            return Err(ModelError::Corrupt("forest has no trees".into()));
        }
        let total: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        Ok(total / self.trees.len() as f64)
    }

    /// Structural checks run after deserializing.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_importances.len() != self.n_features {
            return Err(ModelError::Corrupt(format!(
                "{} importances for {} features",
                self.feature_importances.len(),
                self.n_features
            )));
        }
        if self.feature_importances.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ModelError::Corrupt("negative or non-finite importance".into()));
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.validate(self.n_features))
    }

    pub fn fit(
        records: &[Vec<f64>],
        targets: &[usize],
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        let n_features = records.first().map(Vec::len).unwrap_or(0);
        if records.is_empty() || n_features == 0 {
            return Err(ModelError::Fit("no training records".into()));
        }
        if records.len() != targets.len() {
            return Err(ModelError::Fit(format!(
                "{} records but {} targets",
                records.len(),
                targets.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(ModelError::Fit("forest needs at least one tree".into()));
        }

        let max_features = params
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().floor() as usize)
            .clamp(1, n_features);
        let labels: Vec<bool> = targets.iter().map(|&t| t == 1).collect();

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        let mut importances = vec![0.0; n_features];

        for _ in 0..params.n_trees {
            let bootstrap: Vec<usize> = (0..records.len())
                .map(|_| rng.gen_range(0..records.len()))
                .collect();
            let mut builder = TreeBuilder {
                records,
                labels: &labels,
                params,
                max_features,
                rng: &mut rng,
                nodes: Vec::new(),
                decrease: vec![0.0; n_features],
            };
            builder.grow(bootstrap, 0);

            let total: f64 = builder.decrease.iter().sum();
            if total > 0.0 {
                for (acc, d) in importances.iter_mut().zip(&builder.decrease) {
                    *acc += d / total;
                }
            }
            trees.push(DecisionTree {
                nodes: builder.nodes,
            });
        }

        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            importances.iter_mut().for_each(|v| *v /= sum);
        }

        log::debug!(
            "Fitted random forest: {} trees, {} features, {} per split",
            trees.len(),
            n_features,
            max_features
        );
        Ok(RandomForest {
            n_features,
            trees,
            feature_importances: importances,
        })
    }
}

// ---------------------------------------------------------------------------
// CART growth
// ---------------------------------------------------------------------------

struct TreeBuilder<'a, R: Rng> {
    records: &'a [Vec<f64>],
    labels: &'a [bool],
    params: &'a ForestParams,
    max_features: usize,
    rng: &'a mut R,
    nodes: Vec<Node>,
    /// Weighted impurity decrease accumulated per feature.
    decrease: Vec<f64>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

impl<R: Rng> TreeBuilder<'_, R> {
    /// Grow the subtree for `samples` and return its node index.
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let positives = samples.iter().filter(|&&i| self.labels[i]).count();
        let n = samples.len();
        let node_impurity = gini(positives, n);
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            positive: positives as f64 / n.max(1) as f64,
        });

        let depth_capped = self.params.max_depth.is_some_and(|d| depth >= d);
        if node_impurity == 0.0 || n < self.params.min_samples_split || depth_capped {
            return idx;
        }

        let Some(best) = self.best_split(&samples, node_impurity) else {
            return idx;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.records[i][best.feature] <= best.threshold);
        self.decrease[best.feature] += n as f64 * (node_impurity - best.impurity);

        let left_idx = self.grow(left, depth + 1);
        let right_idx = self.grow(right, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: left_idx,
            right: right_idx,
        };
        idx
    }

    /// Lowest weighted child impurity over a random feature subset.
    fn best_split(&mut self, samples: &[usize], node_impurity: f64) -> Option<BestSplit> {
        let n_features = self.decrease.len();
        let candidates = sample(&mut *self.rng, n_features, self.max_features).into_vec();
        let total_pos = samples.iter().filter(|&&i| self.labels[i]).count();
        let n = samples.len();

        let mut best: Option<BestSplit> = None;
        for feature in candidates {
            let mut sorted: Vec<(f64, bool)> = samples
                .iter()
                .map(|&i| (self.records[i][feature], self.labels[i]))
                .collect();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_pos = 0;
            for k in 1..n {
                if sorted[k - 1].1 {
                    left_pos += 1;
                }
                if sorted[k - 1].0 == sorted[k].0 {
                    continue;
                }
                let impurity = (k as f64 * gini(left_pos, k)
                    + (n - k) as f64 * gini(total_pos - left_pos, n - k))
                    / n as f64;
                if impurity < node_impurity
                    && best.as_ref().map_or(true, |b| impurity < b.impurity)
                {
                    best = Some(BestSplit {
                        feature,
                        threshold: (sorted[k - 1].0 + sorted[k].0) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }
}
