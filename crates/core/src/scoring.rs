//! Grading rules shared by every in-process scorer.

use thiserror::Error;

use crate::model::{AnswerSlot, Question, QuestionReview, QuizResult};

/// Minimum percentage needed to pass.
pub const PASSING_THRESHOLD_PERCENT: u32 = 60;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("too many questions to score: {len}")]
    TooManyQuestions { len: usize },
}

//
// ─── RULES ─────────────────────────────────────────────────────────────────────
//

/// `round(100 * score / total)`, rounding halves up. Zero questions score 0.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score.min(total));
    let total = u64::from(total);
    let rounded = (200 * score + total) / (2 * total);
    // bounded by 100
    u32::try_from(rounded).unwrap_or(100)
}

#[must_use]
pub fn is_passing(percentage: u32) -> bool {
    percentage >= PASSING_THRESHOLD_PERCENT
}

/// Grade `answers` against `questions`, position by position.
///
/// Unanswered slots are always incorrect and stay unanswered in the review.
///
/// # Errors
///
/// Returns `ScoringError::AnswerCountMismatch` if the slot count differs from the
/// question count, and `ScoringError::TooManyQuestions` if the count does not fit in `u32`.
pub fn grade(
    questions: &[Question],
    answers: &[AnswerSlot],
    time_spent_secs: u32,
) -> Result<QuizResult, ScoringError> {
    if questions.len() != answers.len() {
        return Err(ScoringError::AnswerCountMismatch {
            expected: questions.len(),
            actual: answers.len(),
        });
    }
    let total = u32::try_from(questions.len())
        .map_err(|_| ScoringError::TooManyQuestions {
            len: questions.len(),
        })?;

    let details: Vec<QuestionReview> = questions
        .iter()
        .zip(answers)
        .map(|(question, &chosen)| review(question, chosen))
        .collect();

    // details.len() == total, which fits in u32
    let score = details.iter().filter(|d| d.is_correct).count() as u32;
    let percentage = percentage(score, total);

    Ok(QuizResult {
        score,
        total_questions: total,
        percentage,
        passed: is_passing(percentage),
        time_spent_secs,
        details,
    })
}

fn review(question: &Question, chosen: AnswerSlot) -> QuestionReview {
    QuestionReview {
        question_id: question.id(),
        prompt: question.prompt().to_string(),
        options: question.options().to_vec(),
        chosen,
        correct_answer: question.correct_answer(),
        is_correct: question.is_correct(chosen),
        explanation: question.explanation().to_string(),
        category: question.category().to_string(),
    }
}
