// src/ledger.rs
//
// Owns session identity, the per-session score counters, and the mapping
// from a session to its allocated question set. All state lives in the
// store; nothing is cached between requests.

use sqlx::SqlitePool;

use crate::{allocator, error::AppError, models::session::Progress, repository};

/// Creates a new session together with its question set, atomically.
///
/// Session ids are `max + 1`. The zero-scored session row and the 35
/// ordered `question_sets` rows are inserted in one transaction: either
/// both appear or neither does. Returns the new session id.
pub async fn create_session(pool: &SqlitePool) -> Result<i64, AppError> {
    // Draw the set up front; an undersized bank fails before anything is
    // written.
    let bank = repository::all_ids(pool).await?;
    let question_set = allocator::allocate(&bank)?;

    let mut tx = pool.begin().await?;

    let session_id =
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(session_id), 0) + 1 FROM sessions")
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query(
        "INSERT INTO sessions (session_id, questions_correct, questions_incorrect) VALUES (?, 0, 0)",
    )
    .bind(session_id)
    .execute(&mut *tx)
    .await?;

    // Insertion order is the delivery order; row_id preserves it.
    for question_id in &question_set {
        sqlx::query("INSERT INTO question_sets (session_id, question_id) VALUES (?, ?)")
            .bind(session_id)
            .bind(question_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!("Created session {}", session_id);
    Ok(session_id)
}

/// Returns true when a session row exists for this id.
pub async fn session_exists(pool: &SqlitePool, session_id: i64) -> Result<bool, AppError> {
    let found =
        sqlx::query_scalar::<_, i64>("SELECT session_id FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

/// Running counters for a session. An unknown session id is not an error:
/// tokens are client-supplied and may be stale, so it reads as (0, 0).
pub async fn get_progress(pool: &SqlitePool, session_id: i64) -> Result<Progress, AppError> {
    let progress = sqlx::query_as::<_, Progress>(
        "SELECT questions_correct, questions_incorrect FROM sessions WHERE session_id = ?",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?
    .unwrap_or(Progress {
        questions_correct: 0,
        questions_incorrect: 0,
    });
    Ok(progress)
}

/// Number of answers recorded so far, correct plus incorrect.
pub async fn get_answered_count(pool: &SqlitePool, session_id: i64) -> Result<i64, AppError> {
    Ok(get_progress(pool, session_id).await?.answered())
}

/// Bumps the matching counter by exactly one. The UPDATE carries the
/// 35-answer cap in its WHERE clause, so the check and the increment are
/// one atomic statement: two racing submits for the same session cannot
/// lose an increment, and a session at the cap cannot gain one. Returns
/// whether a row was updated; unknown session ids and full sessions match
/// no row.
pub async fn record_answer(
    pool: &SqlitePool,
    session_id: i64,
    was_correct: bool,
) -> Result<bool, AppError> {
    let statement = if was_correct {
        "UPDATE sessions SET questions_correct = questions_correct + 1
         WHERE session_id = ? AND questions_correct + questions_incorrect < ?"
    } else {
        "UPDATE sessions SET questions_incorrect = questions_incorrect + 1
         WHERE session_id = ? AND questions_correct + questions_incorrect < ?"
    };
    let result = sqlx::query(statement)
        .bind(session_id)
        .bind(allocator::QUESTION_SET_SIZE as i64)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Same read as [`get_progress`], used at the results stage. Idempotent.
pub async fn tally(pool: &SqlitePool, session_id: i64) -> Result<Progress, AppError> {
    get_progress(pool, session_id).await
}

/// The session's persisted question set in delivery order. Empty for an
/// unknown session id.
pub async fn question_set(pool: &SqlitePool, session_id: i64) -> Result<Vec<i64>, AppError> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT question_id FROM question_sets WHERE session_id = ? ORDER BY row_id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}
