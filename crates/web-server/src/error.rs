use analytics::AnalyticsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use narrative::NarrativeError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Narrative error: {0}")]
    Narrative(#[from] NarrativeError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Analytics(err) if err.is_not_found() => (StatusCode::NOT_FOUND, err.to_string()),
            AppError::Analytics(AnalyticsError::InvalidInput(message)) => (StatusCode::BAD_REQUEST, message),
            AppError::Analytics(err) => {
                tracing::error!(error = ?err, "Analytics error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during analysis".to_string(),
                )
            }
            AppError::Narrative(err @ NarrativeError::UnknownKind(..)) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Narrative(err) => {
                tracing::error!(error = ?err, "Narrative error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A narrative service error occurred".to_string(),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
