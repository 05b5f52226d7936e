// ============================================================================
// Error Handling - JSON Error Responses
// ============================================================================
//
// Every handler returns `Result<T, AppError>`. The error is rendered as
//
//   { "error": "<message>", "status": <code> }
//
// Client errors (validation, malformed JSON/query/path, business rules)
// carry a human-readable message. Persistence errors are logged server-side
// and returned as 500 with the database message. Authorization failures are
// uniform: a missing key and a wrong key produce the same response.
//
// ============================================================================

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] JsonRejection),

    #[error("Query error: {0}")]
    Query(#[from] QueryRejection),

    #[error("Path error: {0}")]
    Path(#[from] PathRejection),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_)
            | AppError::Json(_)
            | AppError::Query(_)
            | AppError::Path(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                err.to_string()
            }
            AppError::Validation(errors) => errors.to_string(),
            AppError::Json(rejection) => rejection.body_text(),
            AppError::Query(rejection) => rejection.body_text(),
            AppError::Path(rejection) => rejection.body_text(),
            AppError::BadRequest(msg) => msg,
            AppError::Unauthorized => "unauthorized".to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
