//! One assessment, start to finish:
//!
//! ```text
//!   RawInput ──► encoder ──► EncodedInput ──► predictor ──► Prediction
//!                                  │                            │
//!                                  └────────► explainer ──► Explanation
//!                                                               │
//!                                             presenter ◄───────┘
//! ```
//!
//! Every stage is a pure function of its inputs and the read-only
//! [`ModelEntry`]; nothing is kept between submissions.

pub mod encoder;
pub mod error;
pub mod explainer;
pub mod predictor;
pub mod presenter;

pub use encoder::{EncodedInput, RawInput, RawValue};
pub use error::{ParseError, PipelineError};
pub use explainer::{Direction, Explanation, FeatureContribution, Strategy};
pub use predictor::{Prediction, Verdict, DECISION_THRESHOLD};
pub use presenter::{present, Presentation, Tone};

use crate::condition::{Condition, ConditionProfile};
use crate::model::ModelEntry;

/// Result of running encoder, predictor and explainer on one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskReport {
    pub condition: Condition,
    pub input: EncodedInput,
    pub prediction: Prediction,
    pub explanation: Explanation,
}

/// Run one submission through the pipeline for `profile`'s condition.
pub fn assess(
    profile: &ConditionProfile,
    entry: &ModelEntry,
    raw: &RawInput,
) -> Result<RiskReport, PipelineError> {
    let input = encoder::encode(profile, &entry.schema, raw)?;
    let prediction = predictor::predict(entry, &input)?;
    let explanation =
        explainer::explain(profile, &entry.artifact.classifier, &entry.schema, &input);

    log::debug!(
        "{} assessment: p={:.4} verdict={:?}",
        profile.condition,
        prediction.probability,
        prediction.verdict
    );

    Ok(RiskReport {
        condition: profile.condition,
        input,
        prediction,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, FeatureSchema, LogisticModel, ModelArtifact};

    const HEART_COLUMNS: [&str; 13] = [
        "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
        "slope", "ca", "thal",
    ];

    fn heart_entry(coefficients: Vec<f64>, intercept: f64) -> ModelEntry {
        let artifact = ModelArtifact::new(Classifier::Logistic(LogisticModel {
            coefficients,
            intercept,
        }));
        ModelEntry::new(artifact, FeatureSchema::new(HEART_COLUMNS).unwrap()).unwrap()
    }

    fn heart_scenario() -> RawInput {
        RawInput::new()
            .number("age", 50.0)
            .label("sex", "Male")
            .label("cp", "Typical Angina (0)")
            .number("trestbps", 120.0)
            .number("chol", 200.0)
            .label("fbs", "No (0)")
            .label("restecg", "Normal (0)")
            .number("thalach", 150.0)
            .label("exang", "No (0)")
            .number("oldpeak", 1.0)
            .label("slope", "Upsloping (0)")
            .number("ca", 0.0)
            .label("thal", "Normal (3)")
    }

    #[test]
    fn heart_scenario_runs_end_to_end() {
        let mut coefficients = vec![0.0; 13];
        coefficients[0] = 0.04; // age
        coefficients[7] = -0.02; // thalach
        coefficients[9] = 0.6; // oldpeak
        let entry = heart_entry(coefficients, -0.5);

        let profile = Condition::Heart.profile();
        let report = assess(profile, &entry, &heart_scenario()).unwrap();
        assert_eq!(
            report.input.values(),
            &[50.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 0.0, 0.0, 3.0]
        );

        // z = 2.0 - 3.0 + 0.6 - 0.5 = -0.9
        let expected = 1.0 / (1.0 + 0.9f64.exp());
        assert!((report.prediction.probability - expected).abs() < 1e-12);
        assert_eq!(report.prediction.verdict, Verdict::Negative);
        assert_eq!(report.explanation.ranked.len(), 13);
        assert_eq!(report.explanation.ranked[0].feature, "thalach");

        let shown = present(profile, &report);
        assert_eq!(shown.advisory.tone, Tone::Success);
        assert_eq!(shown.risk_percent, 29);
    }

    #[test]
    fn positive_scenario_gets_warning() {
        let mut coefficients = vec![0.0; 13];
        coefficients[9] = 2.0;
        let entry = heart_entry(coefficients, 0.0);
        let report = assess(Condition::Heart.profile(), &entry, &heart_scenario()).unwrap();
        assert!(report.prediction.verdict.is_positive());
        let shown = present(Condition::Heart.profile(), &report);
        assert_eq!(shown.advisory.tone, Tone::Warning);
    }

    #[test]
    fn parse_errors_surface_without_output() {
        let entry = heart_entry(vec![0.0; 13], 0.0);
        let raw = heart_scenario().label("thal", "Normal");
        assert!(matches!(
            assess(Condition::Heart.profile(), &entry, &raw),
            Err(PipelineError::Parse(ParseError::MissingCode { .. }))
        ));
    }
}
