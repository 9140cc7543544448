use serde::Serialize;

use crate::features::schema::FeatureSchema;
use crate::inference::model::Classifier;
use crate::inference::InferenceError;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Attribution {
    pub feature: String,
    pub value: f64,
}

pub trait Explainer: Send + Sync {
    fn explain(
        &self,
        model: &dyn Classifier,
        scaled: &[f64],
        schema: &FeatureSchema,
    ) -> Result<Vec<Attribution>, InferenceError>;
}

/// Exact additive attribution for linear models: `coef_i * x_i` over
/// standardized inputs, largest magnitude first.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearExplainer;

impl Explainer for LinearExplainer {
    fn explain(
        &self,
        model: &dyn Classifier,
        scaled: &[f64],
        schema: &FeatureSchema,
    ) -> Result<Vec<Attribution>, InferenceError> {
        let weights = model.coefficients().ok_or(InferenceError::Unsupported(
            "attribution requires a linear model",
        ))?;
        if weights.len() != scaled.len() || weights.len() != schema.len() {
            return Err(InferenceError::Dimension {
                stage: "explainer",
                expected: schema.len(),
                got: scaled.len(),
            });
        }

        let mut attributions: Vec<Attribution> = schema
            .columns()
            .iter()
            .zip(weights.iter().zip(scaled))
            .map(|(feature, (w, x))| Attribution {
                feature: feature.clone(),
                value: w * x,
            })
            .collect();
        attributions.sort_by(|a, b| {
            b.value
                .abs()
                .partial_cmp(&a.value.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(attributions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::model::LogisticModel;

    struct Opaque;

    impl Classifier for Opaque {
        fn predict(&self, _scaled: &[f64]) -> Result<u8, InferenceError> {
            Ok(0)
        }
    }

    #[test]
    fn test_attributions_sorted_by_magnitude() {
        let schema = FeatureSchema::new(["age", "sleep_hours", "sentiment_score"]).unwrap();
        let model = LogisticModel { coefficients: vec![0.5, -2.0, 1.0], intercept: 0.0, threshold: 0.5 };
        let out = LinearExplainer.explain(&model, &[2.0, 1.0, 0.1], &schema).unwrap();

        let names: Vec<&str> = out.iter().map(|a| a.feature.as_str()).collect();
        assert_eq!(names, ["sleep_hours", "age", "sentiment_score"]);
        assert_eq!(out[0].value, -2.0);
    }

    #[test]
    fn test_non_linear_model_unsupported() {
        let schema = FeatureSchema::new(["age"]).unwrap();
        let err = LinearExplainer.explain(&Opaque, &[1.0], &schema).unwrap_err();
        assert!(matches!(err, InferenceError::Unsupported(_)));
    }
}
