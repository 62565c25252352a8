// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'questions' table in the database.
///
/// `correct_index` is the 1-based position of the right option (1..=4).
/// Only the grading path may see this struct; everything that leaves the
/// engine goes through [`PublicQuestion`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// 1-based index of the correct option.
    pub correct_index: i64,

    /// The text of the question itself.
    pub prompt: String,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
}

impl Question {
    /// Strips the answer key before the question is handed to the caller.
    pub fn redacted(&self) -> PublicQuestion {
        PublicQuestion {
            id: self.id,
            prompt: self.prompt.clone(),
            options: [
                self.option_a.clone(),
                self.option_b.clone(),
                self.option_c.clone(),
                self.option_d.clone(),
            ],
        }
    }
}

/// DTO for sending a question to the client (excludes the correct index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub prompt: String,
    pub options: [String; 4],
}
