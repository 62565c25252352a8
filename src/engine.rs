// src/engine.rs
//
// Orchestrates the quiz lifecycle: NEW -> IN_PROGRESS -> COMPLETE. The
// engine keeps no state of its own between calls; the position within the
// quiz is always re-derived from the persisted counters, because each HTTP
// request arrives with nothing but the session token.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    allocator::QUESTION_SET_SIZE,
    error::AppError,
    ledger,
    models::{
        question::{PublicQuestion, Question},
        session::QuizResults,
    },
    repository,
};

/// Valid answer indexes; anything outside grades as incorrect.
const OPTION_RANGE: std::ops::RangeInclusive<i64> = 1..=4;

/// What the caller gets back when starting or resuming a quiz.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizStep {
    pub token: i64,
    pub question: Option<PublicQuestion>,
    pub is_complete: bool,
}

/// What the caller gets back after submitting an answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub token: i64,
    pub was_correct: bool,
    pub question: Option<PublicQuestion>,
    pub is_complete: bool,
}

/// The next unanswered question for a session, answer key included.
///
/// The position is the answered-count: question 0 until the first answer
/// lands, and so on. Asking past the 35th answer is a protocol violation,
/// not a wrap-around.
pub async fn next_question(pool: &SqlitePool, session_id: i64) -> Result<Question, AppError> {
    let answered = ledger::get_answered_count(pool, session_id).await?;
    if answered >= QUESTION_SET_SIZE as i64 {
        return Err(AppError::OutOfRange(format!(
            "session {} has already answered all {} questions",
            session_id, QUESTION_SET_SIZE
        )));
    }

    let question_set = ledger::question_set(pool, session_id).await?;
    let question_id = *question_set
        .get(answered as usize)
        .ok_or(AppError::StoreFailure(format!(
            "session {} has no question at position {}",
            session_id, answered
        )))?;

    repository::get_question(pool, question_id).await
}

/// Grades one submitted answer and records it.
///
/// The submitted question must belong to the session's allocated set;
/// nothing else ties an untrusted submission to the question the session
/// was actually shown. A selected option outside 1..=4 is simply wrong.
pub async fn submit_answer(
    pool: &SqlitePool,
    session_id: i64,
    question_id: i64,
    selected_option: i64,
) -> Result<bool, AppError> {
    let answered = ledger::get_answered_count(pool, session_id).await?;
    if answered >= QUESTION_SET_SIZE as i64 {
        return Err(AppError::OutOfRange(format!(
            "session {} has already answered all {} questions",
            session_id, QUESTION_SET_SIZE
        )));
    }

    let question_set = ledger::question_set(pool, session_id).await?;
    if !question_set.contains(&question_id) {
        return Err(AppError::InvalidQuestion(format!(
            "question {} is not part of session {}",
            question_id, session_id
        )));
    }

    let question = repository::get_question(pool, question_id).await?;
    let was_correct =
        OPTION_RANGE.contains(&selected_option) && selected_option == question.correct_index;

    // The guarded UPDATE is the authoritative cap check: the count read
    // above can go stale under a racing submit, the WHERE clause cannot.
    let recorded = ledger::record_answer(pool, session_id, was_correct).await?;
    if !recorded {
        return Err(AppError::OutOfRange(format!(
            "session {} has already answered all {} questions",
            session_id, QUESTION_SET_SIZE
        )));
    }
    Ok(was_correct)
}

/// Entry point for a visit. An absent or unrecognized token starts a fresh
/// session; stale tokens are expected, never an error. Returns the token
/// to round-trip plus the next question, or completion if the session has
/// already answered everything.
pub async fn start_or_resume(
    pool: &SqlitePool,
    token: Option<i64>,
) -> Result<QuizStep, AppError> {
    let session_id = match token {
        Some(id) if ledger::session_exists(pool, id).await? => id,
        _ => ledger::create_session(pool).await?,
    };

    step_for(pool, session_id).await
}

/// Grades an answer and hands back the following question (or completion).
pub async fn answer(
    pool: &SqlitePool,
    token: i64,
    question_id: i64,
    selected_option: i64,
) -> Result<AnswerOutcome, AppError> {
    let was_correct = submit_answer(pool, token, question_id, selected_option).await?;
    let step = step_for(pool, token).await?;

    Ok(AnswerOutcome {
        token: step.token,
        was_correct,
        question: step.question,
        is_complete: step.is_complete,
    })
}

/// Final tally for a session. Idempotent; mutates nothing. The caller
/// discards its token after this call, so a stale token tallies as zero.
pub async fn final_results(pool: &SqlitePool, token: i64) -> Result<QuizResults, AppError> {
    let progress = ledger::tally(pool, token).await?;
    Ok(QuizResults {
        correct: progress.questions_correct,
        incorrect: progress.questions_incorrect,
        total_answered: progress.answered(),
    })
}

async fn step_for(pool: &SqlitePool, session_id: i64) -> Result<QuizStep, AppError> {
    let answered = ledger::get_answered_count(pool, session_id).await?;
    if answered >= QUESTION_SET_SIZE as i64 {
        return Ok(QuizStep {
            token: session_id,
            question: None,
            is_complete: true,
        });
    }

    let question = next_question(pool, session_id).await?;
    Ok(QuizStep {
        token: session_id,
        question: Some(question.redacted()),
        is_complete: false,
    })
}
