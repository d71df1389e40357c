use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream failure during exam generation. Model-down and
    /// model-returned-garbage both collapse into this one generic error at
    /// the API boundary; the cause is preserved for logging only.
    #[error("Failed to generate exam")]
    ExamGeneration(#[source] anyhow::Error),

    /// Upstream failure during marking, same collapse as `ExamGeneration`.
    #[error("Failed to mark exam")]
    Marking(#[source] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::ExamGeneration(ref cause) => {
                tracing::error!(error = ?cause, "exam generation failed");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            Error::Marking(ref cause) => {
                tracing::error!(error = ?cause, "exam marking failed");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Anyhow(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
