use quiz_core::time::{format_time, is_time_warning};
use quiz_core::{AnswerSheet, AnswerSlot, Question, QuizResult};

use crate::source::SourceStatus;

use super::state::{Phase, Stage};

/// Read-only view of a session, published after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub current_index: usize,
    pub total_questions: usize,
    pub current_question: Option<Question>,
    pub answers: AnswerSheet,
    pub time_left_secs: u32,
    pub time_limit_secs: u32,
    pub result: Option<QuizResult>,
    pub error_message: Option<String>,
    pub source_status: SourceStatus,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(
            self.phase,
            Phase::Running | Phase::Submitting | Phase::Completed | Phase::Failed(Stage::Submit)
        )
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    #[must_use]
    pub fn failed_stage(&self) -> Option<Stage> {
        match self.phase {
            Phase::Failed(stage) => Some(stage),
            _ => None,
        }
    }

    /// Remaining time as `MM:SS`.
    #[must_use]
    pub fn formatted_time(&self) -> String {
        format_time(self.time_left_secs)
    }

    #[must_use]
    pub fn is_time_warning(&self) -> bool {
        is_time_warning(self.time_left_secs)
    }

    /// The option recorded for the current question.
    #[must_use]
    pub fn selected_answer(&self) -> AnswerSlot {
        self.answers.get(self.current_index)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.total_questions
    }
}
