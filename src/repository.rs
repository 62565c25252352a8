// src/repository.rs
//
// Read-only access to the question bank. Questions are loaded out of band
// and never mutated here.

use sqlx::SqlitePool;

use crate::{error::AppError, models::question::Question};

/// Fetches a single question, answer key included.
pub async fn get_question(pool: &SqlitePool, id: i64) -> Result<Question, AppError> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, correct_index, prompt, option_a, option_b, option_c, option_d
        FROM questions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound(format!("Question {} not found", id)))
}

/// Every question id in the bank. Used by the allocator to draw from.
pub async fn all_ids(pool: &SqlitePool) -> Result<Vec<i64>, AppError> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM questions")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// Size of the question bank.
pub async fn count(pool: &SqlitePool) -> Result<i64, AppError> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
