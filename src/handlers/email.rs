use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{EmailPurpose, EmailReminderRequest, EmailReminderResponse};
use crate::error::AppResult;
use crate::storage::prediction_log::{summarize, PredictionSummary};
use crate::AppState;

const SIGN_OFF: &str = "\n\n— Your Depression Risk App";

/// Composes the reminder text. `summary` is only consulted for progress
/// summaries; `None` means the prediction log could not be read.
pub fn compose_email(req: &EmailReminderRequest, summary: Option<&PredictionSummary>) -> String {
    let mut body = format!("Dear {},\n\n", req.user_name);

    match req.purpose {
        EmailPurpose::DailyReminder => {
            body.push_str("This is your gentle reminder to check in with your mood and wellbeing today.");
        }
        EmailPurpose::ProgressSummary => match summary {
            Some(summary) => {
                body.push_str(&format!("So far, you've logged {} entries.\n", summary.total));
                body.push_str(&format!("Of those, {} showed signs of risk.\n\n", summary.at_risk));
                body.push_str("Keep tracking your wellness!");
            }
            None => {
                body.push_str("We couldn't find your logs yet. Please make your first prediction today!");
            }
        },
        EmailPurpose::CheckInMessage => {
            body.push_str(
                "Hope you're doing well! Remember to care for yourself today, even small steps count.",
            );
        }
    }

    if let Some(msg) = req.custom_message.as_deref().filter(|m| !m.is_empty()) {
        body.push_str("\n\nCustom message:\n");
        body.push_str(msg);
    }

    body.push_str(SIGN_OFF);
    body
}

pub async fn generate_email(
    State(state): State<AppState>,
    Json(body): Json<EmailReminderRequest>,
) -> AppResult<Json<EmailReminderResponse>> {
    body.validate()?;

    let summary = if body.purpose == EmailPurpose::ProgressSummary {
        let handle = &state.logs.predictions;
        match handle.read().await {
            Ok(Some(table)) => Some(summarize(&table, handle.schema())),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Prediction log unreadable for progress summary");
                None
            }
        }
    } else {
        None
    };

    Ok(Json(EmailReminderResponse {
        body: compose_email(&body, summary.as_ref()),
    }))
}
