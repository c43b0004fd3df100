use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::forest::RandomForest;
use super::linear::LogisticModel;
use super::ModelError;

/// The fitted classifier inside an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    Logistic(LogisticModel),
    Forest(RandomForest),
}

impl Classifier {
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::Logistic(m) => m.n_features(),
            Classifier::Forest(f) => f.n_features(),
        }
    }

    /// Positive-class probability for one encoded row.
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        match self {
            Classifier::Logistic(m) => m.predict_proba(features),
            Classifier::Forest(f) => f.predict_proba(features),
        }
    }

    /// Human-readable model family.
    pub fn family(&self) -> &'static str {
        match self {
            Classifier::Logistic(_) => "Logistic Regression",
            Classifier::Forest(_) => "Random Forest",
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Classifier::Logistic(m) => {
                if m.coefficients.iter().chain([&m.intercept]).any(|v| !v.is_finite()) {
                    return Err(ModelError::Corrupt("non-finite coefficient".into()));
                }
                Ok(())
            }
            Classifier::Forest(f) => f.validate(),
        }
    }
}

/// Held-out (and optionally cross-validated) scores recorded by a trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    pub f1: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_f1: Option<f64>,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl fmt::Display for TrainingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.3}", self.accuracy)?;
        write!(f, "F1 Score: {:.3}", self.f1)?;
        if let Some(cv) = self.cv_accuracy {
            write!(f, "\nCV Accuracy: {cv:.3}")?;
        }
        if let Some(cv) = self.cv_f1 {
            write!(f, "\nCV F1 Score: {cv:.3}")?;
        }
        Ok(())
    }
}

/// A trained classifier plus what the dashboard shows about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub classifier: Classifier,
    #[serde(default)]
    pub metrics: Option<TrainingMetrics>,
}

impl ModelArtifact {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: TrainingMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Read and structurally validate an artifact file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&text).map_err(|source| ModelError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        artifact.classifier.validate()?;
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let text = serde_json::to_string(self).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_is_tagged_by_kind() {
        let artifact = ModelArtifact::new(Classifier::Logistic(LogisticModel {
            coefficients: vec![0.5, -1.0],
            intercept: 0.1,
        }));
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["classifier"]["kind"], "logistic");
        assert!(json["metrics"].is_null());
    }

    #[test]
    fn load_rejects_non_finite_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        std::fs::write(
            &path,
            r#"{"classifier":{"kind":"logistic","coefficients":[1.0],"intercept":1e999}}"#,
        )
        .unwrap();
        // 1e999 overflows to infinity or fails to parse; both are load errors.
        assert!(ModelArtifact::load(&path).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        let artifact = ModelArtifact::new(Classifier::Logistic(LogisticModel {
            coefficients: vec![0.25],
            intercept: -0.5,
        }))
        .with_metrics(TrainingMetrics {
            accuracy: 0.88,
            f1: 0.86,
            cv_accuracy: None,
            cv_f1: None,
            train_rows: 240,
            test_rows: 60,
        });
        artifact.save(&path).unwrap();
        assert_eq!(ModelArtifact::load(&path).unwrap(), artifact);
    }
}
