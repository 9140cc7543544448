use serde::Serialize;

use crate::features::schema::FeatureSchema;
use crate::models::input::RawInput;

/// Numeric vector keyed and ordered by a [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    fn zeroed(schema: &FeatureSchema) -> Self {
        Self {
            columns: schema.columns().to_vec(),
            values: vec![0.0; schema.len()],
        }
    }

    /// Sets `column` if the schema declared it; unknown columns are ignored.
    fn set(&mut self, column: &str, value: f64) {
        if let Some(idx) = self.columns.iter().position(|c| c == column) {
            self.values[idx] = value;
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.values[idx])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Maps one form submission onto the model's feature layout.
///
/// Every schema column starts at 0. Numeric fields and `sentiment_score` are
/// copied by exact name, and the `gender_<value>` / `occupation_<value>`
/// one-hot columns are raised to 1 when the schema declares them. Names the
/// schema does not know are skipped, so the result always has exactly the
/// schema's columns in the schema's order.
pub fn build_feature_vector(input: &RawInput, sentiment_score: f64, schema: &FeatureSchema) -> FeatureVector {
    let mut vector = FeatureVector::zeroed(schema);

    vector.set("age", f64::from(input.age));
    vector.set("sleep_hours", f64::from(input.sleep_hours));
    vector.set("activity_level", f64::from(input.activity_level));
    vector.set("social_media_time", f64::from(input.social_media_time));
    vector.set("sentiment_score", sentiment_score);

    vector.set(&format!("gender_{}", input.gender.as_str()), 1.0);
    vector.set(&format!("occupation_{}", input.occupation.as_str()), 1.0);

    vector
}
