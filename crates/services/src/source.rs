use async_trait::async_trait;
use quiz_core::Question;

use crate::error::ApiError;

/// Whether questions came from the configured source or a stand-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceStatus {
    #[default]
    Healthy,
    /// The primary source failed and a fallback served the questions.
    Degraded { reason: String },
}

impl SourceStatus {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Questions handed to a session, tagged with where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedQuestions {
    pub questions: Vec<Question>,
    pub status: SourceStatus,
}

impl LoadedQuestions {
    #[must_use]
    pub fn healthy(questions: Vec<Question>) -> Self {
        Self {
            questions,
            status: SourceStatus::Healthy,
        }
    }

    #[must_use]
    pub fn degraded(questions: Vec<Question>, reason: impl Into<String>) -> Self {
        Self {
            questions,
            status: SourceStatus::Degraded {
                reason: reason.into(),
            },
        }
    }
}

/// Supplies the ordered question list for a quiz.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the questions for a new session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the questions cannot be produced.
    async fn get_questions(&self) -> Result<LoadedQuestions, ApiError>;
}
