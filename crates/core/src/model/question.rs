use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} needs at least 2 options, got {len}")]
    TooFewOptions { id: QuestionId, len: usize },

    #[error("question {id} marks option {index} as correct but only has {len} options")]
    CorrectAnswerOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Minimum number of options a multiple-choice question must offer.
pub const MIN_OPTIONS: usize = 2;

/// A single multiple-choice question.
///
/// Immutable once built; `Question::new` guarantees the option list has at
/// least [`MIN_OPTIONS`] entries and that the correct answer indexes into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_answer: usize,
    category: String,
    difficulty: String,
    explanation: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank,
    /// `QuestionError::TooFewOptions` for fewer than two options and
    /// `QuestionError::CorrectAnswerOutOfRange` if `correct_answer` is not a valid option index.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        category: impl Into<String>,
        difficulty: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                id,
                len: options.len(),
            });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                id,
                index: correct_answer,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_answer,
            category: category.into(),
            difficulty: difficulty.into(),
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// True when `index` names one of this question's options.
    #[must_use]
    pub fn accepts(&self, index: usize) -> bool {
        index < self.options.len()
    }

    /// True when `choice` is the correct option. Unanswered is never correct.
    #[must_use]
    pub fn is_correct(&self, choice: Option<usize>) -> bool {
        choice == Some(self.correct_answer)
    }
}
