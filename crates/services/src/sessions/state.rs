use quiz_core::scoring;
use quiz_core::{AnswerSheet, AnswerSlot, Question, QuizResult};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{ApiError, QuizError};
use crate::source::{LoadedQuestions, SourceStatus};

use super::snapshot::SessionSnapshot;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Which request a failed session was waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Submit,
}

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the question source (or for Load to be re-invoked).
    Loading,
    /// Questions loaded, quiz not started.
    Idle,
    /// Countdown running, answers editable.
    Running,
    /// A submission is in flight.
    Submitting,
    /// Scored; the result is available.
    Completed,
    /// The request for `Stage` failed; the error message is set.
    Failed(Stage),
}

/// What a countdown tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Ignored,
    Counting { time_left: u32 },
    /// The tick consumed the last second. The caller must submit.
    Expired,
}

/// Payload for the scorer, taken when a submission begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: u64,
    pub answers: Vec<AnswerSlot>,
    pub time_spent_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Load(u64),
    Submit(u64),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Owned quiz session state with synchronous transitions.
///
/// Every method is a complete transition: it validates the current phase,
/// mutates, and reports whether anything changed. Actions that are not valid in
/// the current phase are no-ops. Requests to collaborators are represented by
/// tickets; a response is applied only if its ticket is the one in flight.
#[derive(Debug)]
pub struct SessionState {
    config: SessionConfig,
    phase: Phase,
    questions: Vec<Question>,
    current: usize,
    answers: AnswerSheet,
    time_left: u32,
    result: Option<QuizResult>,
    error: Option<QuizError>,
    source_status: SourceStatus,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl SessionState {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            phase: Phase::Loading,
            questions: Vec::new(),
            current: 0,
            answers: AnswerSheet::default(),
            time_left: config.time_limit_secs(),
            result: None,
            error: None,
            source_status: SourceStatus::Healthy,
            in_flight: None,
            next_ticket: 1,
        }
    }

    fn issue_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    // ── load ──

    /// Begin loading questions. Valid before the first load and after a load failure.
    pub fn begin_load(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            return None;
        }
        if !matches!(self.phase, Phase::Loading | Phase::Failed(Stage::Load)) {
            return None;
        }
        let ticket = self.issue_ticket();
        self.phase = Phase::Loading;
        self.error = None;
        self.in_flight = Some(InFlight::Load(ticket));
        debug!(ticket, "loading questions");
        Some(ticket)
    }

    /// Apply the question source response for `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: u64,
        outcome: Result<LoadedQuestions, ApiError>,
    ) -> bool {
        if self.in_flight != Some(InFlight::Load(ticket)) {
            debug!(ticket, "dropping stale question source response");
            return false;
        }
        self.in_flight = None;

        match outcome.and_then(|loaded| {
            if loaded.questions.is_empty() {
                Err(ApiError::Empty)
            } else {
                Ok(loaded)
            }
        }) {
            Ok(loaded) => {
                if let SourceStatus::Degraded { reason } = &loaded.status {
                    warn!(%reason, "questions served in degraded mode");
                }
                info!(count = loaded.questions.len(), "questions loaded");
                self.answers = AnswerSheet::unanswered(loaded.questions.len());
                self.questions = loaded.questions;
                self.source_status = loaded.status;
                self.current = 0;
                self.time_left = self.config.time_limit_secs();
                self.phase = Phase::Idle;
            }
            Err(err) => {
                warn!(error = %err, "loading questions failed");
                self.error = Some(QuizError::Load(err));
                self.phase = Phase::Failed(Stage::Load);
            }
        }
        true
    }

    // ── running ──

    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Running;
        info!(time_limit = self.config.time_limit_secs(), "quiz started");
        true
    }

    /// Record `index` for the current question. Requires a valid option index.
    pub fn select_answer(&mut self, index: usize) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(question) = self.questions.get(self.current) else {
            return false;
        };
        if !question.accepts(index) {
            return false;
        }
        self.answers.set(self.current, index)
    }

    pub fn next(&mut self) -> bool {
        if self.phase != Phase::Running || self.current + 1 >= self.questions.len() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.phase != Phase::Running || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Consume one second of the countdown.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Counting {
                time_left: self.time_left,
            }
        }
    }

    // ── submission ──

    /// Begin a submission from `Running`, or retry one after a submit failure.
    ///
    /// Returns `None` while any request is in flight, which makes submission single-flight.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.in_flight.is_some() {
            return None;
        }
        if !matches!(self.phase, Phase::Running | Phase::Failed(Stage::Submit)) {
            return None;
        }
        let ticket = self.issue_ticket();
        self.phase = Phase::Submitting;
        self.error = None;
        self.in_flight = Some(InFlight::Submit(ticket));

        let submission = Submission {
            ticket,
            answers: self.answers.as_slice().to_vec(),
            time_spent_secs: self.time_spent_secs(),
        };
        info!(
            ticket,
            answered = self.answers.answered_count(),
            time_spent = submission.time_spent_secs,
            "submitting quiz"
        );
        Some(submission)
    }

    /// Apply the scorer response for `ticket`.
    pub fn finish_submit(&mut self, ticket: u64, outcome: Result<QuizResult, ApiError>) -> bool {
        if self.in_flight != Some(InFlight::Submit(ticket)) {
            debug!(ticket, "dropping stale scorer response");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                let result = self.reconcile(result);
                info!(
                    score = result.score,
                    total = result.total_questions,
                    percentage = result.percentage,
                    passed = result.passed,
                    "quiz scored"
                );
                self.result = Some(result);
                self.phase = Phase::Completed;
            }
            Err(err) => {
                warn!(error = %err, "submitting quiz failed");
                self.error = Some(QuizError::Submit(err));
                self.phase = Phase::Failed(Stage::Submit);
            }
        }
        true
    }

    /// Align the scorer's review with the answers that were actually sent, then
    /// recompute the totals from the aligned rows.
    ///
    /// Answers cannot change while a submission is in flight, so the sheet still
    /// holds the submitted slots.
    fn reconcile(&self, mut result: QuizResult) -> QuizResult {
        let expected = self.questions.len();
        if result.total_questions as usize != expected || result.details.len() != expected {
            warn!(
                expected,
                total = result.total_questions,
                details = result.details.len(),
                "scorer result does not match the loaded questions"
            );
        }
        let rows = result
            .details
            .iter_mut()
            .zip(self.answers.as_slice())
            .zip(&self.questions);
        for ((detail, &slot), question) in rows {
            if detail.chosen != slot {
                debug!(question = %detail.question_id, ?slot, reported = ?detail.chosen, "correcting reported answer");
                detail.chosen = slot;
            }
            detail.correct_answer = question.correct_answer();
            detail.is_correct = question.is_correct(slot);
        }

        let score = u32::try_from(result.correct_details()).unwrap_or(u32::MAX);
        if score != result.score {
            warn!(reported = result.score, score, "correcting reported score");
        }
        result.score = score;
        result.percentage = scoring::percentage(score, result.total_questions);
        result.passed = scoring::is_passing(result.percentage);
        result
    }

    /// Return to `Running` after a submit failure, if time remains.
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Failed(Stage::Submit) || self.time_left == 0 {
            return false;
        }
        self.error = None;
        self.phase = Phase::Running;
        info!(time_left = self.time_left, "quiz resumed");
        true
    }

    /// Reset progress for another attempt over the already-loaded questions.
    pub fn restart(&mut self) -> bool {
        if !matches!(self.phase, Phase::Completed | Phase::Failed(Stage::Submit)) {
            return false;
        }
        self.current = 0;
        self.answers.clear();
        self.time_left = self.config.time_limit_secs();
        self.result = None;
        self.error = None;
        self.phase = Phase::Idle;
        info!("quiz restarted");
        true
    }

    // ── queries ──

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u32 {
        self.config.time_limit_secs().saturating_sub(self.time_left)
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&QuizError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn source_status(&self) -> &SourceStatus {
        &self.source_status
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(
            self.phase,
            Phase::Running | Phase::Submitting | Phase::Completed | Phase::Failed(Stage::Submit)
        )
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            current_index: self.current,
            total_questions: self.questions.len(),
            current_question: self.current_question().cloned(),
            answers: self.answers.clone(),
            time_left_secs: self.time_left,
            time_limit_secs: self.config.time_limit_secs(),
            result: self.result.clone(),
            error_message: self.error.as_ref().map(ToString::to_string),
            source_status: self.source_status.clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
