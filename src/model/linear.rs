use linfa::Dataset;
use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Binary logistic regression on raw (unscaled) features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One weight per schema slot.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Probability of the positive class.
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_input(features, self.n_features())?;
        let z: f64 = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        Ok(sigmoid(z))
    }

    /// Fit an L2-regularized logistic regression.
    ///
    /// `targets` must hold both classes 0 and 1.
    pub fn fit(
        records: &[Vec<f64>],
        targets: &[usize],
        max_iterations: u64,
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

        let flat: Vec<f64> = records.iter().flatten().copied().collect();
        let x = Array2::from_shape_vec((records.len(), n_features), flat)
            .map_err(|e| ModelError::Fit(e.to_string()))?;
        let y = Array1::from_vec(targets.to_vec());
        let dataset = Dataset::new(x, y);

        let fitted = LogisticRegression::default()
            .max_iterations(max_iterations)
            .fit(&dataset)
            .map_err(|e| ModelError::Fit(e.to_string()))?;

        let mut coefficients = fitted.params().to_vec();
        let mut intercept = fitted.intercept();
        // Parameters are expressed for whichever label linfa picked as positive.
        if fitted.labels().pos.class != 1 {
            coefficients.iter_mut().for_each(|w| *w = -*w);
            intercept = -intercept;
        }

        log::debug!("Fitted logistic regression on {} rows", records.len());
        Ok(LogisticModel {
            coefficients,
            intercept,
        })
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

pub(crate) fn check_input(features: &[f64], expected: usize) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::Dimension {
            expected,
            found: features.len(),
        });
    }
    match features.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(ModelError::NonFiniteInput(idx)),
        None => Ok(()),
    }
}
