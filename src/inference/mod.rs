//! Pre-trained artifacts and the prediction pipeline.
//!
//! Everything here is loaded once at startup into an immutable [`Artifacts`]
//! bundle and shared by reference across requests.

pub mod explain;
pub mod model;
pub mod scaler;
pub mod sentiment;

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::features::builder::FeatureVector;
use crate::features::schema::{FeatureSchema, SchemaError};
use crate::models::prediction::PredictionLabel;
use crate::storage::schema::LOG_ONLY_COLUMNS;
use explain::{Explainer, LinearExplainer};
use model::{Classifier, LogisticModel};
use scaler::{Scaler, StandardScaler};
use sentiment::{LexiconSentiment, SentimentAnalyzer};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURES_FILE: &str = "features.json";

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("{stage} expected {expected} features, got {got}")]
    Dimension {
        stage: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} produced a non-finite value")]
    NonFinite(&'static str),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("sentiment analysis failed: {0}")]
    Sentiment(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{artifact} has {got} entries but the feature schema has {expected}")]
    Mismatch {
        artifact: &'static str,
        expected: usize,
        got: usize,
    },
}

pub struct Artifacts {
    pub schema: FeatureSchema,
    pub scaler: Box<dyn Scaler>,
    pub model: Box<dyn Classifier>,
    pub sentiment: Box<dyn SentimentAnalyzer>,
    pub explainer: Box<dyn Explainer>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Artifacts {
    /// Wires a logistic model and standard scaler to the schema, checking that
    /// all three agree on the feature count.
    pub fn from_parts(
        schema: FeatureSchema,
        scaler: StandardScaler,
        model: LogisticModel,
    ) -> Result<Self, ArtifactError> {
        schema.reject_reserved(&LOG_ONLY_COLUMNS)?;
        if scaler.dims() != schema.len() || scaler.scale.len() != schema.len() {
            return Err(ArtifactError::Mismatch {
                artifact: "scaler",
                expected: schema.len(),
                got: scaler.dims().min(scaler.scale.len()),
            });
        }
        if model.dims() != schema.len() {
            return Err(ArtifactError::Mismatch {
                artifact: "model",
                expected: schema.len(),
                got: model.dims(),
            });
        }

        Ok(Self {
            schema,
            scaler: Box::new(scaler),
            model: Box::new(model),
            sentiment: Box::new(LexiconSentiment::new()),
            explainer: Box::new(LinearExplainer),
        })
    }

    pub fn load(model_dir: &Path) -> Result<Self, ArtifactError> {
        let columns: Vec<String> = read_json(&model_dir.join(FEATURES_FILE))?;
        let schema = FeatureSchema::new(columns)?;
        let scaler: StandardScaler = read_json(&model_dir.join(SCALER_FILE))?;
        let model: LogisticModel = read_json(&model_dir.join(MODEL_FILE))?;

        let artifacts = Self::from_parts(schema, scaler, model)?;
        tracing::info!(
            model_dir = %model_dir.display(),
            features = artifacts.schema.len(),
            "Model artifacts loaded"
        );
        Ok(artifacts)
    }
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: PredictionLabel,
    pub scaled: Vec<f64>,
}

/// Scales the vector, classifies it, and maps class 1 to "At Risk".
pub fn predict(
    vector: &FeatureVector,
    scaler: &dyn Scaler,
    model: &dyn Classifier,
) -> Result<Prediction, InferenceError> {
    let scaled = scaler.transform(vector.values())?;
    let class = model.predict(&scaled)?;
    Ok(Prediction {
        label: PredictionLabel::from_class(class),
        scaled,
    })
}
