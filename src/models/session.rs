// src/models/session.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'sessions' table in the database.
/// One row per anonymous visitor taking the quiz.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SessionRow {
    pub session_id: i64,
    pub questions_correct: i64,
    pub questions_incorrect: i64,
}

/// Running score of a session, read back from persisted counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct Progress {
    pub questions_correct: i64,
    pub questions_incorrect: i64,
}

impl Progress {
    pub fn answered(&self) -> i64 {
        self.questions_correct + self.questions_incorrect
    }
}

/// Final tally shown once the quiz is complete.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizResults {
    pub correct: i64,
    pub incorrect: i64,
    pub total_answered: i64,
}
