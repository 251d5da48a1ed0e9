use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use quiz_core::{AnswerSlot, QuizResult};
use tracing::warn;

use crate::error::ApiError;
use crate::scorer::Scorer;
use crate::source::{LoadedQuestions, QuestionSource};

/// Serves questions from `fallback` when `primary` fails to load them.
///
/// A fallback load is reported as `SourceStatus::Degraded`, and scoring follows
/// whichever side served the questions so answers are graded against the quiz
/// the user actually saw.
#[derive(Debug)]
pub struct FallbackQuizApi<P, F> {
    primary: P,
    fallback: F,
    degraded: AtomicBool,
}

impl<P, F> FallbackQuizApi<P, F> {
    #[must_use]
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
            degraded: AtomicBool::new(false),
        }
    }

    /// True when the last load was served by the fallback.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }
}

#[async_trait]
impl<P, F> QuestionSource for FallbackQuizApi<P, F>
where
    P: QuestionSource,
    F: QuestionSource,
{
    async fn get_questions(&self) -> Result<LoadedQuestions, ApiError> {
        match self.primary.get_questions().await {
            Ok(loaded) => {
                self.degraded.store(false, Ordering::Release);
                Ok(loaded)
            }
            Err(err) => {
                warn!(error = %err, "primary question source failed, serving fallback questions");
                let loaded = self.fallback.get_questions().await?;
                self.degraded.store(true, Ordering::Release);
                Ok(LoadedQuestions::degraded(loaded.questions, err.to_string()))
            }
        }
    }
}

#[async_trait]
impl<P, F> Scorer for FallbackQuizApi<P, F>
where
    P: Scorer,
    F: Scorer,
{
    async fn submit_quiz(
        &self,
        answers: &[AnswerSlot],
        time_spent_secs: u32,
    ) -> Result<QuizResult, ApiError> {
        if self.is_degraded() {
            self.fallback.submit_quiz(answers, time_spent_secs).await
        } else {
            self.primary.submit_quiz(answers, time_spent_secs).await
        }
    }
}
