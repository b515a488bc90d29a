use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vefa_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vefa_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::ProjectNotFound { .. } | CoreError::MilestoneNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::AlreadyPaid { .. } => {
                    (StatusCode::CONFLICT, "ALREADY_PAID", core.to_string())
                }
                CoreError::NotPayable { .. } => {
                    (StatusCode::CONFLICT, "NOT_PAYABLE", core.to_string())
                }
                CoreError::MissingProof => {
                    (StatusCode::BAD_REQUEST, "MISSING_PROOF", core.to_string())
                }
                CoreError::InvalidFileType { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_FILE_TYPE", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
