//! # Request/Response DTOs
//!
//! All API contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Ranges mirror the sliders of the check-in form and are expressed via
//!   `validator` derive macros

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::builder::FeatureVector;
use crate::inference::explain::Attribution;
use crate::models::input::{Gender, Occupation, RawInput};
use crate::models::mood::{DailyMoodCount, Mood, MoodTrendPoint};
use crate::models::prediction::{CareRecommendations, PredictionLabel};
use crate::storage::prediction_log::PredictionSummary;

// ============================================================================
// Check-in form
// ============================================================================

/// Lifestyle fields shared by POST /api/predict, POST /api/mood and
/// POST /api/admin/explain
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssessmentRequest {
    #[validate(range(min = 12, max = 80, message = "Age must be between 12 and 80"))]
    pub age: i32,

    pub gender: Gender,

    pub occupation: Occupation,

    #[validate(range(min = 0, max = 12, message = "Sleep hours must be between 0 and 12"))]
    pub sleep_hours: i32,

    #[validate(range(min = 0, max = 10, message = "Activity level must be between 0 and 10"))]
    pub activity_level: i32,

    #[validate(range(min = 0, max = 12, message = "Social media time must be between 0 and 12"))]
    pub social_media_time: i32,

    /// Recent social media post. Default: ""
    #[serde(default)]
    #[validate(length(max = 5000, message = "Post text must be under 5000 characters"))]
    pub post_text: String,
}

impl From<AssessmentRequest> for RawInput {
    fn from(req: AssessmentRequest) -> Self {
        Self {
            age: req.age,
            gender: req.gender,
            occupation: req.occupation,
            sleep_hours: req.sleep_hours,
            activity_level: req.activity_level,
            social_media_time: req.social_media_time,
            post_text: req.post_text,
        }
    }
}

/// POST /api/predict
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: PredictionLabel,
    pub sentiment_score: f64,
    pub features: FeatureVector,
    pub recommendations: CareRecommendations,
    /// Set when the prediction could not be written to the log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_warning: Option<String>,
}

// ============================================================================
// Mood
// ============================================================================

/// POST /api/mood
#[derive(Debug, Deserialize, Validate)]
pub struct MoodRequest {
    pub mood: Mood,

    #[serde(flatten)]
    #[validate]
    pub profile: AssessmentRequest,
}

#[derive(Debug, Serialize)]
pub struct MoodSubmitResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub sentiment_score: f64,
}

/// GET /api/mood/trend
#[derive(Debug, Serialize)]
pub struct MoodTrendResponse {
    pub has_data: bool,
    pub points: Vec<MoodTrendPoint>,
    pub skipped_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/predictions
#[derive(Debug, Deserialize)]
pub struct PredictionLogQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PredictionLogResponse {
    pub has_data: bool,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub summary: PredictionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/admin/mood-summary
#[derive(Debug, Serialize)]
pub struct MoodSummaryResponse {
    pub has_data: bool,
    pub days: Vec<DailyMoodCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/admin/explain
#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub label: PredictionLabel,
    pub explanation: Option<Vec<Attribution>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Email reminder
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EmailPurpose {
    DailyReminder,
    ProgressSummary,
    CheckInMessage,
}

/// POST /api/email-reminder
#[derive(Debug, Deserialize, Validate)]
pub struct EmailReminderRequest {
    #[validate(length(max = 100, message = "Name must be under 100 characters"))]
    pub user_name: String,

    pub purpose: EmailPurpose,

    #[validate(length(max = 2000, message = "Custom message must be under 2000 characters"))]
    pub custom_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailReminderResponse {
    pub body: String,
}
