// src/allocator.rs

use rand::seq::SliceRandom;

use crate::error::AppError;

/// Every quiz is exactly this long.
pub const QUESTION_SET_SIZE: usize = 35;

/// Draws the question set for a new session: 35 distinct ids sampled
/// uniformly without replacement, implemented as a shuffle over the full
/// id pool.
///
/// The returned order is the delivery order for the session. The caller
/// persists it; it is never regenerated, so re-reads across requests see
/// the identical sequence.
pub fn allocate(pool_ids: &[i64]) -> Result<Vec<i64>, AppError> {
    if pool_ids.len() < QUESTION_SET_SIZE {
        return Err(AppError::InsufficientQuestions(format!(
            "question bank holds {} questions, need at least {}",
            pool_ids.len(),
            QUESTION_SET_SIZE
        )));
    }

    let mut ids = pool_ids.to_vec();
    ids.shuffle(&mut rand::thread_rng());
    ids.truncate(QUESTION_SET_SIZE);
    Ok(ids)
}
