use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::auth::middleware::AdminSession;
use crate::dto::{
    AssessmentRequest, ExplainResponse, MoodSummaryResponse, PredictionLogQuery,
    PredictionLogResponse,
};
use crate::error::{AppError, AppResult};
use crate::features;
use crate::inference;
use crate::models::input::RawInput;
use crate::storage::mood_log::daily_mood_counts;
use crate::storage::prediction_log::{summarize, tail};
use crate::AppState;

const MAX_LOG_ROWS: usize = 1000;
pub const EXPORT_FILE_NAME: &str = "depression_logs.csv";

pub async fn list_predictions(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(query): Query<PredictionLogQuery>,
) -> AppResult<Json<PredictionLogResponse>> {
    let limit = query
        .limit
        .unwrap_or(state.config.admin_log_limit)
        .min(MAX_LOG_ROWS);
    let handle = &state.logs.predictions;

    tracing::debug!(scheme = session.scheme, limit, "Admin viewing prediction log");

    let Some(table) = handle.read().await?.filter(|t| !t.is_empty()) else {
        return Ok(Json(PredictionLogResponse {
            has_data: false,
            columns: handle.schema().columns.clone(),
            rows: Vec::new(),
            summary: Default::default(),
            message: Some("No user logs found.".into()),
        }));
    };

    Ok(Json(PredictionLogResponse {
        has_data: true,
        columns: table.columns.clone(),
        rows: tail(&table, limit),
        summary: summarize(&table, handle.schema()),
        message: None,
    }))
}

pub async fn mood_summary(State(state): State<AppState>) -> AppResult<Json<MoodSummaryResponse>> {
    let handle = &state.logs.moods;

    let days = handle
        .read()
        .await?
        .map(|table| daily_mood_counts(&table, handle.schema()))
        .unwrap_or_default();

    let response = if days.is_empty() {
        MoodSummaryResponse {
            has_data: false,
            days,
            message: Some("No mood logs found.".into()),
        }
    } else {
        MoodSummaryResponse {
            has_data: true,
            days,
            message: None,
        }
    };

    Ok(Json(response))
}

pub async fn explain_prediction(
    State(state): State<AppState>,
    Json(body): Json<AssessmentRequest>,
) -> AppResult<Json<ExplainResponse>> {
    body.validate()?;
    let input = RawInput::from(body);
    let artifacts = &state.artifacts;

    let assembled = features::assemble(artifacts, &input);
    let prediction = inference::predict(
        &assembled.vector,
        artifacts.scaler.as_ref(),
        artifacts.model.as_ref(),
    )?;

    let (explanation, warning) = match artifacts.explainer.explain(
        artifacts.model.as_ref(),
        &prediction.scaled,
        &artifacts.schema,
    ) {
        Ok(attributions) => (Some(attributions), None),
        Err(e) => {
            tracing::warn!(error = %e, "Explanation unavailable");
            (None, Some(format!("Explanation unavailable: {e}")))
        }
    };

    Ok(Json(ExplainResponse {
        label: prediction.label,
        explanation,
        warning,
    }))
}

pub async fn export_predictions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let bytes = state
        .logs
        .predictions
        .read_raw()
        .await?
        .ok_or_else(|| AppError::NotFound("No log data available to export.".into()))?;

    tracing::info!(bytes = bytes.len(), "Prediction log exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    ))
}
