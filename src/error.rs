// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 404 Not Found (unknown question id, a data error)
    NotFound(String),

    // 500 Internal Server Error (question bank smaller than a quiz set;
    // fatal configuration error, the quiz cannot start)
    InsufficientQuestions(String),

    // 409 Conflict (a question requested or answered past the end of the
    // quiz, which is a caller protocol violation)
    OutOfRange(String),

    // 400 Bad Request (submitted question does not belong to the session's
    // allocated set; no state is mutated)
    InvalidQuestion(String),

    // 500 Internal Server Error (any store access failure; never retried
    // here, the request-level caller retries)
    StoreFailure(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InsufficientQuestions(msg) => {
                tracing::error!("Question bank too small: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Not enough questions to start a quiz".to_string(),
                )
            }
            AppError::OutOfRange(msg) => (StatusCode::CONFLICT, msg),
            AppError::InvalidQuestion(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::StoreFailure(msg) => {
                tracing::error!("Store failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::StoreFailure`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StoreFailure(err.to_string())
    }
}
