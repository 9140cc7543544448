use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::dto::{AssessmentRequest, PredictResponse};
use crate::error::AppResult;
use crate::features;
use crate::inference;
use crate::models::input::RawInput;
use crate::models::prediction::CareRecommendations;
use crate::storage::prediction_log::prediction_record;
use crate::AppState;

pub async fn predict_risk(
    State(state): State<AppState>,
    Json(body): Json<AssessmentRequest>,
) -> AppResult<Json<PredictResponse>> {
    body.validate()?;
    let input = RawInput::from(body);

    let assembled = features::assemble(&state.artifacts, &input);
    let prediction = inference::predict(
        &assembled.vector,
        state.artifacts.scaler.as_ref(),
        state.artifacts.model.as_ref(),
    )?;

    tracing::info!(
        label = %prediction.label,
        sentiment = assembled.sentiment_score,
        "Risk predicted"
    );

    // A failed log write must not cost the user their result
    let timestamp = Utc::now();
    let logged = match prediction_record(
        state.logs.predictions.schema(),
        &assembled.vector,
        prediction.label,
        &timestamp,
    ) {
        Ok(record) => state.logs.predictions.append(record).await,
        Err(e) => Err(e),
    };
    let log_warning = match logged {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, path = %state.logs.predictions.path().display(), "Failed to log prediction");
            Some(format!("Your result could not be saved: {e}"))
        }
    };

    Ok(Json(PredictResponse {
        label: prediction.label,
        sentiment_score: assembled.sentiment_score,
        features: assembled.vector,
        recommendations: CareRecommendations::for_label(prediction.label),
        log_warning,
    }))
}
