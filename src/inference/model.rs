use serde::Deserialize;

use crate::inference::InferenceError;

pub trait Classifier: Send + Sync {
    /// Returns the predicted class, 0 or 1.
    fn predict(&self, scaled: &[f64]) -> Result<u8, InferenceError>;

    /// Per-feature weights when the model is linear in its inputs.
    fn coefficients(&self) -> Option<&[f64]> {
        None
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// Binary logistic regression over standardized features.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticModel {
    pub fn dims(&self) -> usize {
        self.coefficients.len()
    }

    pub fn probability(&self, scaled: &[f64]) -> Result<f64, InferenceError> {
        if scaled.len() != self.coefficients.len() {
            return Err(InferenceError::Dimension {
                stage: "model",
                expected: self.coefficients.len(),
                got: scaled.len(),
            });
        }

        let logit: f64 = self.intercept
            + scaled
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>();

        if !logit.is_finite() {
            return Err(InferenceError::NonFinite("model"));
        }
        Ok(1.0 / (1.0 + (-logit).exp()))
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, scaled: &[f64]) -> Result<u8, InferenceError> {
        let p = self.probability(scaled)?;
        Ok(u8::from(p >= self.threshold))
    }

    fn coefficients(&self) -> Option<&[f64]> {
        Some(&self.coefficients)
    }
}
