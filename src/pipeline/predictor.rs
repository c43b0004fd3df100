use super::encoder::EncodedInput;
use super::error::PipelineError;
use crate::model::ModelEntry;

/// Probability at or above which the verdict is positive.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The profile resembles the condition's positive cases.
    Positive,
    Negative,
}

impl Verdict {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= DECISION_THRESHOLD {
            Verdict::Positive
        } else {
            Verdict::Negative
        }
    }

    pub fn is_positive(self) -> bool {
        self == Verdict::Positive
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub verdict: Verdict,
}

impl Prediction {
    pub fn new(probability: f64) -> Self {
        Prediction {
            probability,
            verdict: Verdict::from_probability(probability),
        }
    }

    /// Probability as a whole percentage, halves rounded away from zero.
    pub fn risk_percent(&self) -> u32 {
        (self.probability * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

/// Score an encoded row against the entry's classifier.
pub fn predict(entry: &ModelEntry, input: &EncodedInput) -> Result<Prediction, PipelineError> {
    if input.values().len() != entry.schema.len() {
        return Err(PipelineError::SchemaMismatch(format!(
            "expected {} values, got {}",
            entry.schema.len(),
            input.values().len()
        )));
    }
    if input.slots() != entry.schema.names() {
        return Err(PipelineError::SchemaMismatch(format!(
            "expected slots [{}], got [{}]",
            entry.schema.names().join(", "),
            input.slots().join(", ")
        )));
    }

    let probability = entry
        .artifact
        .classifier
        .predict_proba(input.values())
        .map_err(|e| PipelineError::Inference(e.to_string()))?;

    if !(0.0..=1.0).contains(&probability) {
        return Err(PipelineError::Inference(format!(
            "probability {probability} outside [0, 1]"
        )));
    }

    Ok(Prediction::new(probability))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, FeatureSchema, LogisticModel, ModelArtifact};

    fn entry(coefficients: Vec<f64>, intercept: f64) -> ModelEntry {
        let schema = FeatureSchema::new((0..coefficients.len()).map(|i| format!("x{i}"))).unwrap();
        let artifact = ModelArtifact::new(Classifier::Logistic(LogisticModel {
            coefficients,
            intercept,
        }));
        ModelEntry::new(artifact, schema).unwrap()
    }

    fn row(entry: &ModelEntry, values: Vec<f64>) -> EncodedInput {
        EncodedInput::new(entry.schema.names().to_vec(), values)
    }

    #[test]
    fn threshold_is_inclusive() {
        let e = entry(vec![1.0], 0.0);
        let p = predict(&e, &row(&e, vec![0.0])).unwrap();
        assert_eq!(p.probability, 0.5);
        assert_eq!(p.verdict, Verdict::Positive);
        assert_eq!(p.risk_percent(), 50);

        let p = predict(&e, &row(&e, vec![-1e-9])).unwrap();
        assert_eq!(p.verdict, Verdict::Negative);
    }

    #[test]
    fn risk_percent_rounds() {
        assert_eq!(Prediction::new(0.734).risk_percent(), 73);
        assert_eq!(Prediction::new(0.7351).risk_percent(), 74);
        assert_eq!(Prediction::new(1.0).risk_percent(), 100);
        assert_eq!(Prediction::new(0.0).risk_percent(), 0);
    }

    #[test]
    fn slot_order_must_match_schema() {
        let e = entry(vec![1.0, 2.0], 0.0);
        let swapped = EncodedInput::new(vec!["x1".into(), "x0".into()], vec![1.0, 2.0]);
        assert!(matches!(predict(&e, &swapped), Err(PipelineError::SchemaMismatch(_))));
    }

    #[test]
    fn surplus_or_missing_values_are_rejected() {
        let e = entry(vec![1.0, 2.0], 0.0);
        let long = EncodedInput::new(e.schema.names().to_vec(), vec![1.0, 2.0, 99.0]);
        assert_eq!(long.len(), 3);
        assert!(matches!(predict(&e, &long), Err(PipelineError::SchemaMismatch(_))));

        let short = EncodedInput::new(e.schema.names().to_vec(), vec![1.0]);
        assert!(matches!(predict(&e, &short), Err(PipelineError::SchemaMismatch(_))));
    }

    #[test]
    fn non_finite_input_is_an_inference_error() {
        let e = entry(vec![1.0], 0.0);
        assert!(matches!(
            predict(&e, &row(&e, vec![f64::NAN])),
            Err(PipelineError::Inference(_))
        ));
    }
}
