use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::inference::InferenceError;
use crate::storage::csv_log::LogError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Admin access required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Prediction failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Log error: {0}")]
    Log(#[from] LogError),

    /// A log write the user asked for and must hear about.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        source: LogError,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Inference(e) => {
                tracing::error!(error = %e, "Inference error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Storage { source, .. } => {
                tracing::error!(error = %source, "Log write failed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Log(e) => {
                tracing::error!(error = %e, "Log error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "code": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let storage = AppError::Storage {
            context: "Failed to save mood",
            source: LogError::Arity { expected: 9, got: 1 },
        };
        assert_eq!(storage.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_error_message_names_context() {
        let err = AppError::Storage {
            context: "Failed to save mood",
            source: LogError::Arity { expected: 9, got: 1 },
        };
        assert!(err.to_string().starts_with("Failed to save mood: "));
    }
}
