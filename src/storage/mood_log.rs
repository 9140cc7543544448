use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::input::Gender;
use crate::models::mood::{DailyMoodCount, Mood, MoodEntry, MoodTrend, MoodTrendPoint};
use crate::storage::csv_log::{self, LogError, LogTable};
use crate::storage::schema::LogSchema;
use crate::storage::{format_timestamp, parse_timestamp};

pub fn mood_record(entry: &MoodEntry) -> Vec<String> {
    vec![
        format_timestamp(&entry.timestamp),
        entry.mood.as_str().to_string(),
        entry.age.to_string(),
        entry.gender.as_str().to_string(),
        entry.sleep_hours.to_string(),
        entry.activity_level.to_string(),
        entry.social_media_time.to_string(),
        entry.sentiment_score.to_string(),
        entry.post_text.clone(),
    ]
}

fn field<'a>(row: &'a csv::StringRecord, schema: &LogSchema, column: &str) -> Option<&'a str> {
    schema.index_of(column).and_then(|idx| row.get(idx))
}

pub fn parse_mood_entry(row: &csv::StringRecord, schema: &LogSchema) -> Option<MoodEntry> {
    let int = |column: &str| field(row, schema, column)?.trim().parse::<i32>().ok();
    let gender = match field(row, schema, "gender")?.trim() {
        "Male" => Gender::Male,
        "Female" => Gender::Female,
        _ => return None,
    };

    Some(MoodEntry {
        timestamp: parse_timestamp(field(row, schema, "timestamp")?)?,
        mood: field(row, schema, "mood")?.parse().ok()?,
        age: int("age")?,
        gender,
        sleep_hours: int("sleep_hours")?,
        activity_level: int("activity_level")?,
        social_media_time: int("social_media_time")?,
        sentiment_score: field(row, schema, "sentiment_score")?.trim().parse().ok()?,
        post_text: field(row, schema, "post_text")?.to_string(),
    })
}

fn timestamp_and_mood(row: &csv::StringRecord, schema: &LogSchema) -> Option<(chrono::DateTime<chrono::Utc>, Mood)> {
    let ts = parse_timestamp(field(row, schema, "timestamp")?)?;
    let mood = field(row, schema, "mood")?.parse::<Mood>().ok()?;
    Some((ts, mood))
}

/// Turns mood rows into `(timestamp, score)` points in file order. Rows with
/// an unreadable timestamp or mood are skipped and counted. `has_data` is
/// set only when at least one point survived.
pub fn trend_from_table(table: &LogTable, schema: &LogSchema) -> MoodTrend {
    let mut trend = MoodTrend::default();

    for (line, row) in table.rows.iter().enumerate() {
        match timestamp_and_mood(row, schema) {
            Some((timestamp, mood)) => trend.points.push(MoodTrendPoint {
                timestamp,
                mood_score: mood.score(),
            }),
            None => {
                // +2: header line and 1-based numbering
                tracing::warn!(line = line + 2, "Skipping unreadable mood log row");
                trend.skipped_rows += 1;
            }
        }
    }
    trend.has_data = !trend.points.is_empty();
    trend
}

/// Reads the mood log as a trend. A missing file is an empty trend.
pub fn load_mood_trend(path: &Path) -> Result<MoodTrend, LogError> {
    let schema = LogSchema::mood();
    match csv_log::read_log(path, &schema)? {
        Some(table) => Ok(trend_from_table(&table, &schema)),
        None => Ok(MoodTrend::default()),
    }
}

/// Per-day counts of each mood, ordered by date.
pub fn daily_mood_counts(table: &LogTable, schema: &LogSchema) -> Vec<DailyMoodCount> {
    let mut by_day: BTreeMap<NaiveDate, DailyMoodCount> = BTreeMap::new();

    for row in &table.rows {
        let Some((ts, mood)) = timestamp_and_mood(row, schema) else {
            continue;
        };
        let date = ts.date_naive();
        let day = by_day.entry(date).or_insert(DailyMoodCount {
            date,
            good: 0,
            okay: 0,
            not_good: 0,
        });
        match mood {
            Mood::Good => day.good += 1,
            Mood::Okay => day.okay += 1,
            Mood::NotGood => day.not_good += 1,
        }
    }

    by_day.into_values().collect()
}
