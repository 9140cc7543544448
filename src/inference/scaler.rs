use serde::Deserialize;

use crate::inference::InferenceError;

pub trait Scaler: Send + Sync {
    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Standardization fit at training time: `(x - mean) / scale`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn dims(&self) -> usize {
        self.mean.len()
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if values.len() != self.mean.len() {
            return Err(InferenceError::Dimension {
                stage: "scaler",
                expected: self.mean.len(),
                got: values.len(),
            });
        }

        values
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                // constant features were fit with zero variance
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                let scaled = (x - mean) / scale;
                if scaled.is_finite() {
                    Ok(scaled)
                } else {
                    Err(InferenceError::NonFinite("scaler"))
                }
            })
            .collect()
    }
}
