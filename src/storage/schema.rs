use crate::features::schema::FeatureSchema;

pub const PREDICTION_LOG: &str = "predictions";
pub const MOOD_LOG: &str = "mood";

pub const PREDICTION_LABEL_COLUMN: &str = "prediction_label";
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Columns the prediction log appends after the features.
pub const LOG_ONLY_COLUMNS: [&str; 2] = [PREDICTION_LABEL_COLUMN, TIMESTAMP_COLUMN];

pub const MOOD_COLUMNS: [&str; 9] = [
    "timestamp",
    "mood",
    "age",
    "gender",
    "sleep_hours",
    "activity_level",
    "social_media_time",
    "sentiment_score",
    "post_text",
];

/// Column layout of a log file. Writers and readers of the same file share
/// one instance so row order can never drift from the header.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSchema {
    pub name: &'static str,
    pub version: u32,
    pub columns: Vec<String>,
}

impl LogSchema {
    /// Feature columns followed by `prediction_label` and `timestamp`.
    pub fn prediction(features: &FeatureSchema) -> Self {
        let mut columns = features.columns().to_vec();
        columns.extend(LOG_ONLY_COLUMNS.iter().map(|c| c.to_string()));
        Self {
            name: PREDICTION_LOG,
            version: 1,
            columns,
        }
    }

    pub fn mood() -> Self {
        Self {
            name: MOOD_LOG,
            version: 1,
            columns: MOOD_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}
