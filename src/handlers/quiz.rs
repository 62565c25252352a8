// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{engine, error::AppError};

/// Request body for starting or resuming a quiz.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// Token from a previous visit, if the client still has one.
    pub token: Option<i64>,
}

/// Request body for submitting an answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub token: i64,
    pub question_id: i64,
    /// 1-based option index. Out-of-range values grade as incorrect.
    pub selected_option: i64,
}

/// Query parameters for the results endpoint.
#[derive(Debug, Deserialize)]
pub struct ResultsParams {
    pub token: i64,
}

/// Starts a new quiz session or resumes an existing one.
///
/// An absent or stale token silently gets a fresh session; the returned
/// token must be round-tripped on every later call. The question in the
/// response is redacted: the correct index never leaves the engine.
pub async fn start(
    State(pool): State<SqlitePool>,
    Json(payload): Json<StartRequest>,
) -> Result<impl IntoResponse, AppError> {
    let step = engine::start_or_resume(&pool, payload.token).await?;
    Ok(Json(step))
}

/// Grades one answer and returns the following question, or completion.
pub async fn answer(
    State(pool): State<SqlitePool>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = engine::answer(
        &pool,
        payload.token,
        payload.question_id,
        payload.selected_option,
    )
    .await?;
    Ok(Json(outcome))
}

/// Final score for a finished quiz. Idempotent; the client is expected to
/// drop its token after reading this.
pub async fn results(
    State(pool): State<SqlitePool>,
    Query(params): Query<ResultsParams>,
) -> Result<impl IntoResponse, AppError> {
    let results = engine::final_results(&pool, params.token).await?;
    Ok(Json(results))
}
