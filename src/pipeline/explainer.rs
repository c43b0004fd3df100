//! Per-feature contribution scores for one prediction.
//!
//! Linear models score each feature as `coefficient * value`, signed. Tree
//! ensembles report the model-wide impurity importance, unsigned and the same
//! for every input.

use std::cmp::Ordering;

use super::encoder::EncodedInput;
use crate::condition::{ConditionProfile, Summary, TOP_FACTORS};
use crate::model::{Classifier, FeatureSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    IncreasesRisk,
    DecreasesRisk,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::IncreasesRisk => "↑ increases risk",
            Direction::DecreasesRisk => "↓ decreases risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureContribution {
    pub feature: String,
    /// Position in the model schema.
    pub position: usize,
    /// Encoded input value.
    pub value: f64,
    /// Raw score: signed for linear models, non-negative importance otherwise.
    pub score: f64,
    /// `None` for unsigned scores.
    pub direction: Option<Direction>,
}

impl FeatureContribution {
    pub fn magnitude(&self) -> f64 {
        self.score.abs()
    }
}

/// How contributions are computed, fixed by the model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Linear,
    Ensemble,
}

impl Strategy {
    pub fn for_classifier(classifier: &Classifier) -> Self {
        match classifier {
            Classifier::Logistic(_) => Strategy::Linear,
            Classifier::Forest(_) => Strategy::Ensemble,
        }
    }
}

/// Ranked contributions, largest magnitude first.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub strategy: Strategy,
    pub ranked: Vec<FeatureContribution>,
}

impl Explanation {
    /// Factors for the narrative summary, at most [`TOP_FACTORS`].
    pub fn top_factors(&self, summary: &Summary) -> Vec<&FeatureContribution> {
        self.ranked
            .iter()
            .filter(|c| !summary.increasing_only || c.direction == Some(Direction::IncreasesRisk))
            .take(TOP_FACTORS)
            .collect()
    }
}

/// Unranked contributions in schema order.
pub fn contributions(
    classifier: &Classifier,
    schema: &FeatureSchema,
    input: &EncodedInput,
) -> Vec<FeatureContribution> {
    let scores: Vec<(f64, Option<Direction>)> = match classifier {
        Classifier::Logistic(model) => model
            .coefficients
            .iter()
            .zip(input.values())
            .map(|(c, v)| {
                let score = c * v;
                (score, direction_of(score))
            })
            .collect(),
        Classifier::Forest(forest) => forest
            .feature_importances
            .iter()
            .map(|imp| (*imp, None))
            .collect(),
    };

    schema
        .names()
        .iter()
        .zip(input.values())
        .zip(scores)
        .enumerate()
        .map(|(position, ((feature, value), (score, direction)))| FeatureContribution {
            feature: feature.clone(),
            position,
            value: *value,
            score,
            direction,
        })
        .collect()
}

/// Sort by magnitude descending; equal magnitudes keep schema order.
pub fn rank(contributions: &mut [FeatureContribution]) {
    contributions.sort_by(|a, b| {
        b.magnitude()
            .partial_cmp(&a.magnitude())
            .unwrap_or(Ordering::Equal)
            .then(a.position.cmp(&b.position))
    });
}

/// Drop contributions whose input is zero or whose score rounds to zero.
pub fn drop_zero(contributions: &mut Vec<FeatureContribution>, precision: usize) {
    let scale = 10f64.powi(precision as i32);
    contributions.retain(|c| c.value != 0.0 && (c.magnitude() * scale).round() > 0.0);
}

/// Contribution list for one prediction, filtered and ranked per profile.
pub fn explain(
    profile: &ConditionProfile,
    classifier: &Classifier,
    schema: &FeatureSchema,
    input: &EncodedInput,
) -> Explanation {
    let mut ranked = contributions(classifier, schema, input);
    if profile.zero_filter {
        drop_zero(&mut ranked, profile.precision);
    }
    rank(&mut ranked);
    Explanation {
        strategy: Strategy::for_classifier(classifier),
        ranked,
    }
}

fn direction_of(score: f64) -> Option<Direction> {
    if score > 0.0 {
        Some(Direction::IncreasesRisk)
    } else if score < 0.0 {
        Some(Direction::DecreasesRisk)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::model::{DecisionTree, LogisticModel, Node, RandomForest};

    fn schema(n: usize) -> FeatureSchema {
        FeatureSchema::new((0..n).map(|i| format!("f{i}"))).unwrap()
    }

    fn input(values: Vec<f64>) -> EncodedInput {
        EncodedInput::new(schema(values.len()).names().to_vec(), values)
    }

    fn logistic(coefficients: Vec<f64>) -> Classifier {
        Classifier::Logistic(LogisticModel {
            coefficients,
            intercept: -0.3,
        })
    }

    #[test]
    fn linear_scores_are_signed_products() {
        let c = contributions(&logistic(vec![0.5, -2.0, 1.0]), &schema(3), &input(vec![4.0, 1.5, 0.0]));
        assert_eq!(c[0].score, 2.0);
        assert_eq!(c[0].direction, Some(Direction::IncreasesRisk));
        assert_eq!(c[1].score, -3.0);
        assert_eq!(c[1].direction, Some(Direction::DecreasesRisk));
        assert_eq!(c[2].direction, None);
    }

    #[test]
    fn ranking_is_by_magnitude_then_position() {
        let profile = Condition::Heart.profile();
        let e = explain(
            profile,
            &logistic(vec![1.0, -3.0, 3.0, 0.5]),
            &schema(4),
            &input(vec![1.0, 1.0, 1.0, 1.0]),
        );
        let order: Vec<usize> = e.ranked.iter().map(|c| c.position).collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn ranking_ignores_input_presentation_order() {
        let mut a = contributions(&logistic(vec![0.2, -0.7, 0.4]), &schema(3), &input(vec![3.0, 1.0, 2.0]));
        let mut b = a.clone();
        b.reverse();
        rank(&mut a);
        rank(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn ensemble_scores_do_not_depend_on_input() {
        let forest = Classifier::Forest(RandomForest {
            n_features: 3,
            trees: vec![DecisionTree {
                nodes: vec![Node::Leaf { positive: 0.4 }],
            }],
            feature_importances: vec![0.2, 0.5, 0.3],
        });
        let profile = Condition::Diabetes.profile();
        let a = explain(profile, &forest, &schema(3), &input(vec![1.0, 2.0, 3.0]));
        let b = explain(profile, &forest, &schema(3), &input(vec![90.0, 0.0, -4.0]));
        let scores = |e: &Explanation| e.ranked.iter().map(|c| (c.position, c.score)).collect::<Vec<_>>();
        assert_eq!(scores(&a), scores(&b));
        assert_eq!(a.ranked.len(), 3);
        assert_eq!(a.ranked[0].position, 1);
        assert!(a.ranked.iter().all(|c| c.direction.is_none()));
        assert_eq!(a.strategy, Strategy::Ensemble);
    }

    #[test]
    fn zero_filter_drops_zero_inputs_and_rounded_zero_scores() {
        let profile = Condition::Hypertension.profile();
        let e = explain(
            profile,
            &logistic(vec![1.0, 5.0, 0.00001, -0.2]),
            &schema(4),
            &input(vec![2.0, 0.0, 1.0, 1.0]),
        );
        let kept: Vec<usize> = e.ranked.iter().map(|c| c.position).collect();
        assert_eq!(kept, vec![0, 3]);
    }

    #[test]
    fn increasing_only_summary_skips_protective_factors() {
        let profile = Condition::Hypertension.profile();
        let summary = profile.summary.unwrap();
        let e = explain(
            profile,
            &logistic(vec![-4.0, 1.0, -2.0, 0.5, 0.3, 0.2]),
            &schema(6),
            &input(vec![1.0; 6]),
        );
        let top: Vec<usize> = e.top_factors(&summary).iter().map(|c| c.position).collect();
        assert_eq!(top, vec![1, 3, 4]);

        let all_protective = explain(profile, &logistic(vec![-1.0, -2.0]), &schema(2), &input(vec![1.0, 1.0]));
        assert!(all_protective.top_factors(&summary).is_empty());
    }
}
