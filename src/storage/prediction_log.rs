use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::features::builder::FeatureVector;
use crate::models::prediction::PredictionLabel;
use crate::storage::csv_log::{LogError, LogTable};
use crate::storage::format_timestamp;
use crate::storage::schema::{LogSchema, LOG_ONLY_COLUMNS, PREDICTION_LABEL_COLUMN};

/// Serializes a prediction by position: the feature columns the log schema
/// declares, then the label, then the timestamp.
pub fn prediction_record(
    schema: &LogSchema,
    vector: &FeatureVector,
    label: PredictionLabel,
    timestamp: &DateTime<Utc>,
) -> Result<Vec<String>, LogError> {
    let feature_count = schema
        .columns
        .len()
        .checked_sub(LOG_ONLY_COLUMNS.len())
        .ok_or(LogError::Arity {
            expected: LOG_ONLY_COLUMNS.len(),
            got: schema.columns.len(),
        })?;

    let mut record = Vec::with_capacity(schema.columns.len());
    for feature in &schema.columns[..feature_count] {
        let value = vector
            .get(feature)
            .ok_or_else(|| LogError::MissingColumn(feature.clone()))?;
        record.push(value.to_string());
    }
    record.push(label.as_str().to_string());
    record.push(format_timestamp(timestamp));
    Ok(record)
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PredictionSummary {
    pub total: usize,
    pub at_risk: usize,
    pub counts: BTreeMap<String, usize>,
}

pub fn summarize(table: &LogTable, schema: &LogSchema) -> PredictionSummary {
    let mut summary = PredictionSummary {
        total: table.len(),
        ..Default::default()
    };
    let Some(idx) = schema.columns.iter().rposition(|c| c == PREDICTION_LABEL_COLUMN) else {
        return summary;
    };

    for row in &table.rows {
        let label = row.get(idx).unwrap_or_default();
        if label == PredictionLabel::AtRisk.as_str() {
            summary.at_risk += 1;
        }
        *summary.counts.entry(label.to_string()).or_default() += 1;
    }
    summary
}

/// The last `limit` rows, oldest first.
pub fn tail(table: &LogTable, limit: usize) -> Vec<Vec<String>> {
    let start = table.rows.len().saturating_sub(limit);
    table.rows[start..]
        .iter()
        .map(|row| row.iter().map(str::to_string).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::builder::build_feature_vector;
    use crate::features::schema::FeatureSchema;
    use crate::models::input::{Gender, Occupation, RawInput};
    use crate::storage::csv_log::{append_log, read_log};
    use crate::storage::parse_timestamp;
    use chrono::TimeZone;

    fn vector(schema: &FeatureSchema) -> FeatureVector {
        let input = RawInput {
            age: 31,
            gender: Gender::Female,
            occupation: Occupation::Working,
            sleep_hours: 6,
            activity_level: 3,
            social_media_time: 5,
            post_text: String::new(),
        };
        build_feature_vector(&input, -0.25, schema)
    }

    #[test]
    fn test_written_record_reads_back_identically() {
        let features = FeatureSchema::new(["age", "sentiment_score", "gender_Female", "occupation_Working"]).unwrap();
        let schema = LogSchema::prediction(&features);
        let ts = Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap();
        let vec = vector(&features);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_logs.csv");
        let record = prediction_record(&schema, &vec, PredictionLabel::AtRisk, &ts).unwrap();
        append_log(&path, &record, &schema).unwrap();

        let table = read_log(&path, &schema).unwrap().unwrap();
        let row = &table.rows[0];
        for (i, (column, value)) in vec.iter().enumerate() {
            let read: f64 = row[i].parse().unwrap();
            assert_eq!(read, value, "column {column}");
        }
        assert_eq!(&row[4], "At Risk");
        assert_eq!(parse_timestamp(&row[5]), Some(ts));
    }

    #[test]
    fn test_record_requires_every_feature_column() {
        let features = FeatureSchema::new(["age"]).unwrap();
        let wider = FeatureSchema::new(["age", "sleep_hours"]).unwrap();
        let schema = LogSchema::prediction(&wider);
        let ts = Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap();

        let err = prediction_record(&schema, &vector(&features), PredictionLabel::NotAtRisk, &ts).unwrap_err();
        assert!(matches!(err, LogError::MissingColumn(c) if c == "sleep_hours"));
    }

    #[test]
    fn test_feature_named_like_log_column_keeps_its_value() {
        let features = FeatureSchema::new(["age", "timestamp"]).unwrap();
        let schema = LogSchema::prediction(&features);
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        let record = prediction_record(&schema, &vector(&features), PredictionLabel::AtRisk, &ts).unwrap();
        assert_eq!(record, ["31", "0", "At Risk", "2026-01-01T00:00:00.000000Z"]);
    }

    #[test]
    fn test_summary_counts_labels() {
        let features = FeatureSchema::new(["age"]).unwrap();
        let schema = LogSchema::prediction(&features);
        let table = LogTable {
            columns: schema.columns.clone(),
            rows: vec![
                csv::StringRecord::from(vec!["20", "At Risk", "t"]),
                csv::StringRecord::from(vec!["30", "Not At Risk", "t"]),
                csv::StringRecord::from(vec!["40", "At Risk", "t"]),
            ],
        };

        let summary = summarize(&table, &schema);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.at_risk, 2);
        assert_eq!(summary.counts["Not At Risk"], 1);
    }

    #[test]
    fn test_tail_keeps_latest_rows() {
        let rows = (0..5)
            .map(|i| csv::StringRecord::from(vec![i.to_string()]))
            .collect();
        let table = LogTable { columns: vec!["n".into()], rows };

        assert_eq!(tail(&table, 2), vec![vec!["3".to_string()], vec!["4".to_string()]]);
        assert_eq!(tail(&table, 50).len(), 5);
    }
}
