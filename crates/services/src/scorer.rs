use async_trait::async_trait;
use quiz_core::{AnswerSlot, QuizResult};

use crate::error::ApiError;

/// Grades a submitted answer sheet.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Score `answers` (one slot per question, `None` when unanswered).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the submission cannot be scored.
    async fn submit_quiz(
        &self,
        answers: &[AnswerSlot],
        time_spent_secs: u32,
    ) -> Result<QuizResult, ApiError>;
}
