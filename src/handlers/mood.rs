use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::dto::{MoodRequest, MoodSubmitResponse, MoodTrendResponse};
use crate::error::{AppError, AppResult};
use crate::features::sentiment_or_neutral;
use crate::models::mood::MoodEntry;
use crate::storage::mood_log::{load_mood_trend, mood_record};
use crate::AppState;

pub async fn submit_mood(
    State(state): State<AppState>,
    Json(body): Json<MoodRequest>,
) -> AppResult<Json<MoodSubmitResponse>> {
    body.validate()?;

    let profile = body.profile;
    let sentiment_score = sentiment_or_neutral(state.artifacts.sentiment.as_ref(), &profile.post_text);
    let entry = MoodEntry {
        timestamp: Utc::now(),
        mood: body.mood,
        age: profile.age,
        gender: profile.gender,
        sleep_hours: profile.sleep_hours,
        activity_level: profile.activity_level,
        social_media_time: profile.social_media_time,
        sentiment_score,
        post_text: profile.post_text,
    };

    state
        .logs
        .moods
        .append(mood_record(&entry))
        .await
        .map_err(|source| AppError::Storage {
            context: "Failed to save mood",
            source,
        })?;

    tracing::info!(mood = entry.mood.as_str(), "Mood check-in recorded");

    Ok(Json(MoodSubmitResponse {
        message: "Mood submitted successfully!".into(),
        timestamp: entry.timestamp,
        sentiment_score,
    }))
}

pub async fn mood_trend(State(state): State<AppState>) -> AppResult<Json<MoodTrendResponse>> {
    let trend = state
        .logs
        .moods
        .run_blocking(|path, _| load_mood_trend(path))
        .await?;

    // an existing log with no readable rows is still the empty state
    let message = if !trend.has_data {
        Some("No mood logs found yet.".to_string())
    } else if trend.skipped_rows > 0 {
        Some(format!("{} unreadable row(s) were skipped.", trend.skipped_rows))
    } else {
        None
    };

    Ok(Json(MoodTrendResponse {
        has_data: trend.has_data,
        points: trend.points,
        skipped_rows: trend.skipped_rows,
        message,
    }))
}
