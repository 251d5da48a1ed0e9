use serde::Serialize;

use crate::model::answer::AnswerSlot;
use crate::model::ids::QuestionId;

/// Review line for one question of a scored quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    /// `None` when the question was left unanswered.
    pub chosen: AnswerSlot,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub explanation: String,
    pub category: String,
}

impl QuestionReview {
    #[must_use]
    pub fn chosen_text(&self) -> Option<&str> {
        self.chosen
            .and_then(|index| self.options.get(index))
            .map(String::as_str)
    }

    #[must_use]
    pub fn correct_text(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }
}

/// Outcome of a scored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub passed: bool,
    pub time_spent_secs: u32,
    pub details: Vec<QuestionReview>,
}

impl QuizResult {
    /// Number of detail lines marked correct.
    ///
    /// Normally equals `score`; a remote scorer may disagree with itself, and
    /// consumers that render the review should prefer this count.
    #[must_use]
    pub fn correct_details(&self) -> usize {
        self.details.iter().filter(|d| d.is_correct).count()
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.details.iter().filter(|d| d.chosen.is_none()).count()
    }
}
