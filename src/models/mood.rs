use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::input::Gender;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mood {
    Good,
    Okay,
    NotGood,
}

impl Mood {
    /// Ordinal used for trend charts: Good=2, Okay=1, NotGood=0.
    pub fn score(&self) -> u8 {
        match self {
            Mood::Good => 2,
            Mood::Okay => 1,
            Mood::NotGood => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Good => "Good",
            Mood::Okay => "Okay",
            Mood::NotGood => "NotGood",
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Good" => Ok(Mood::Good),
            "Okay" => Ok(Mood::Okay),
            "NotGood" | "Not Good" => Ok(Mood::NotGood),
            other => Err(format!("unknown mood: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodEntry {
    pub timestamp: DateTime<Utc>,
    pub mood: Mood,
    pub age: i32,
    pub gender: Gender,
    pub sleep_hours: i32,
    pub activity_level: i32,
    pub social_media_time: i32,
    pub sentiment_score: f64,
    pub post_text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoodTrendPoint {
    pub timestamp: DateTime<Utc>,
    pub mood_score: u8,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct MoodTrend {
    pub has_data: bool,
    pub points: Vec<MoodTrendPoint>,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyMoodCount {
    pub date: NaiveDate,
    pub good: u32,
    pub okay: u32,
    pub not_good: u32,
}
