use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::scoring;
use quiz_core::{AnswerSlot, Question, QuestionId, QuizResult};
use services::{
    ApiError, BundledQuestionBank, FallbackQuizApi, LoadedQuestions, Phase, QuestionSource,
    QuizSession, Scorer, SessionAction, SessionConfig, SourceStatus, Stage,
};
use tokio::sync::Semaphore;

fn questions(n: u64) -> Vec<Question> {
    (1..=n)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                format!("Question {id}"),
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                1,
                "general",
                "easy",
                "B is right",
            )
            .unwrap()
        })
        .collect()
}

struct FakeSource {
    questions: Vec<Question>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
    completed: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl FakeSource {
    fn new(n: u64) -> Arc<Self> {
        Arc::new(Self::build(n, 0, None))
    }

    fn failing_first(n: u64, failures: usize) -> Arc<Self> {
        Arc::new(Self::build(n, failures, None))
    }

    fn gated(n: u64, gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self::build(n, 0, Some(gate)))
    }

    fn build(n: u64, failures: usize, gate: Option<Arc<Semaphore>>) -> Self {
        Self {
            questions: questions(n),
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            gate,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionSource for FakeSource {
    async fn get_questions(&self) -> Result<LoadedQuestions, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.failures_left) {
            return Err(ApiError::Rejected("source offline".into()));
        }
        Ok(LoadedQuestions::healthy(self.questions.clone()))
    }
}

struct FakeScorer {
    questions: Vec<Question>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
    completed: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
    received: Mutex<Vec<(Vec<AnswerSlot>, u32)>>,
}

impl FakeScorer {
    fn new(n: u64) -> Arc<Self> {
        Arc::new(Self::build(n, 0, None))
    }

    fn failing_first(n: u64, failures: usize) -> Arc<Self> {
        Arc::new(Self::build(n, failures, None))
    }

    fn gated(n: u64, gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self::build(n, 0, Some(gate)))
    }

    fn build(n: u64, failures: usize, gate: Option<Arc<Semaphore>>) -> Self {
        Self {
            questions: questions(n),
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            gate,
            received: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn received(&self) -> Vec<(Vec<AnswerSlot>, u32)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scorer for FakeScorer {
    async fn submit_quiz(
        &self,
        answers: &[AnswerSlot],
        time_spent_secs: u32,
    ) -> Result<QuizResult, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received
            .lock()
            .unwrap()
            .push((answers.to_vec(), time_spent_secs));
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.failures_left) {
            return Err(ApiError::Rejected("scorer offline".into()));
        }
        Ok(scoring::grade(&self.questions, answers, time_spent_secs)?)
    }
}

fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok()
}

fn config(limit: u32) -> SessionConfig {
    SessionConfig::new(limit).unwrap()
}

async fn idle_session(limit: u32, source: Arc<FakeSource>, scorer: Arc<FakeScorer>) -> QuizSession {
    let session = QuizSession::spawn(config(limit), source, scorer);
    session.wait_for(|s| s.phase == Phase::Idle).await.unwrap();
    session
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn load_sizes_the_answer_sheet() {
    let source = FakeSource::new(3);
    let session = idle_session(300, source.clone(), FakeScorer::new(3)).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.total_questions, 3);
    assert_eq!(snapshot.answers.len(), 3);
    assert_eq!(snapshot.answered_count(), 0);
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(
        snapshot.current_question.as_ref().map(Question::id),
        Some(QuestionId::new(1))
    );
    assert!(!snapshot.is_started());
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn countdown_does_not_run_before_start() {
    let session = idle_session(300, FakeSource::new(1), FakeScorer::new(1)).await;

    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(session.snapshot().time_left_secs, 300);
}

#[tokio::test(start_paused = true)]
async fn single_question_quiz_end_to_end() {
    let scorer = FakeScorer::new(1);
    let session = idle_session(300, FakeSource::new(1), scorer.clone()).await;

    session.start().await.unwrap();
    session.select_answer(1).await.unwrap();
    let submitting = session.submit().await.unwrap();
    assert!(submitting.is_submitting());

    let done = session.wait_for(|s| s.is_completed()).await.unwrap();
    let result = done.result.clone().unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.total_questions, 1);
    assert_eq!(result.percentage, 100);
    assert!(result.passed);
    assert!(result.details[0].is_correct);
    assert!(!done.is_submitting());
    assert_eq!(scorer.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn expiry_submits_exactly_once() {
    let scorer = FakeScorer::new(2);
    let session = idle_session(3, FakeSource::new(2), scorer.clone()).await;

    session.start().await.unwrap();
    session.select_answer(0).await.unwrap();

    let done = session.wait_for(|s| s.is_completed()).await.unwrap();

    assert_eq!(done.time_left_secs, 0);
    assert_eq!(scorer.calls(), 1);
    assert_eq!(scorer.received(), vec![(vec![Some(0), None], 3)]);
    let result = done.result.unwrap();
    assert_eq!(result.time_spent_secs, 3);
    assert_eq!(result.details[1].chosen, None);
    assert!(!result.details[1].is_correct);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(session.snapshot().time_left_secs, 0);
    assert_eq!(scorer.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn one_second_limit_submits_after_first_tick() {
    let scorer = FakeScorer::new(1);
    let session = idle_session(1, FakeSource::new(1), scorer.clone()).await;

    session.start().await.unwrap();
    let done = session.wait_for(|s| s.is_completed()).await.unwrap();

    assert_eq!(done.result.unwrap().time_spent_secs, 1);
    assert_eq!(scorer.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn submission_is_single_flight_and_freezes_the_clock() {
    let gate = Arc::new(Semaphore::new(0));
    let scorer = FakeScorer::gated(2, gate.clone());
    let session = idle_session(300, FakeSource::new(2), scorer.clone()).await;

    session.start().await.unwrap();
    session.select_answer(2).await.unwrap();
    session.submit().await.unwrap();
    let second = session.submit().await.unwrap();
    assert!(second.is_submitting());

    let frozen = session.snapshot().time_left_secs;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(session.snapshot().time_left_secs, frozen);

    let ignored = session.select_answer(0).await.unwrap();
    assert_eq!(ignored.answers.get(0), Some(2));
    assert_eq!(scorer.calls(), 1);

    gate.add_permits(1);
    session.wait_for(|s| s.is_completed()).await.unwrap();
    assert_eq!(scorer.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn navigation_clamps_and_keeps_answers() {
    let session = idle_session(300, FakeSource::new(3), FakeScorer::new(3)).await;
    session.start().await.unwrap();

    let first = session.previous().await.unwrap();
    assert!(first.is_first());

    session.select_answer(3).await.unwrap();
    session.next().await.unwrap();
    session.next().await.unwrap();
    let last = session.next().await.unwrap();
    assert_eq!(last.current_index, 2);
    assert!(last.is_last());

    let back = session.previous().await.unwrap();
    assert_eq!(back.current_index, 1);
    assert_eq!(back.answers.get(0), Some(3));
    assert_eq!(back.selected_answer(), None);
}

#[tokio::test(start_paused = true)]
async fn restart_reuses_loaded_questions() {
    let source = FakeSource::new(2);
    let session = idle_session(120, source.clone(), FakeScorer::new(2)).await;

    session.start().await.unwrap();
    session.select_answer(1).await.unwrap();
    session.next().await.unwrap();
    session.submit().await.unwrap();
    session.wait_for(|s| s.is_completed()).await.unwrap();

    let restarted = session.restart().await.unwrap();

    assert_eq!(restarted.phase, Phase::Idle);
    assert_eq!(restarted.current_index, 0);
    assert_eq!(restarted.answered_count(), 0);
    assert_eq!(restarted.answers.len(), 2);
    assert_eq!(restarted.time_left_secs, 120);
    assert!(restarted.result.is_none());
    assert!(restarted.error_message.is_none());
    assert_eq!(source.calls(), 1);

    let again = session.start().await.unwrap();
    assert_eq!(again.phase, Phase::Running);
}

#[tokio::test(start_paused = true)]
async fn load_failure_can_be_retried() {
    let source = FakeSource::failing_first(2, 1);
    let session = QuizSession::spawn(config(300), source.clone(), FakeScorer::new(2));

    let failed = session
        .wait_for(|s| s.failed_stage() == Some(Stage::Load))
        .await
        .unwrap();
    assert_eq!(
        failed.error_message.as_deref(),
        Some("Failed to load questions: source offline")
    );

    let still_failed = session.start().await.unwrap();
    assert_eq!(still_failed.phase, Phase::Failed(Stage::Load));

    let reloading = session.load().await.unwrap();
    assert!(reloading.error_message.is_none());
    let loaded = session.wait_for(|s| s.phase == Phase::Idle).await.unwrap();
    assert_eq!(loaded.total_questions, 2);
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_submit_keeps_progress_and_can_resume() {
    let scorer = FakeScorer::failing_first(2, 1);
    let session = idle_session(300, FakeSource::new(2), scorer.clone()).await;

    session.start().await.unwrap();
    session.select_answer(1).await.unwrap();
    session.next().await.unwrap();
    session.select_answer(0).await.unwrap();
    session.submit().await.unwrap();

    let failed = session
        .wait_for(|s| s.failed_stage() == Some(Stage::Submit))
        .await
        .unwrap();
    assert_eq!(failed.answers.as_slice(), &[Some(1), Some(0)]);
    assert_eq!(failed.current_index, 1);
    assert!(failed.time_left_secs > 0);
    assert!(failed.result.is_none());
    assert_eq!(
        failed.error_message.as_deref(),
        Some("Failed to submit quiz: scorer offline")
    );

    let resumed = session.resume().await.unwrap();
    assert_eq!(resumed.phase, Phase::Running);
    assert!(resumed.error_message.is_none());
    session.select_answer(1).await.unwrap();

    session.submit().await.unwrap();
    let done = session.wait_for(|s| s.is_completed()).await.unwrap();
    assert_eq!(done.result.unwrap().score, 2);
    assert_eq!(scorer.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_submit_can_be_retried_directly() {
    let scorer = FakeScorer::failing_first(1, 1);
    let session = idle_session(300, FakeSource::new(1), scorer.clone()).await;

    session.start().await.unwrap();
    session.submit().await.unwrap();
    session
        .wait_for(|s| s.failed_stage() == Some(Stage::Submit))
        .await
        .unwrap();

    session.submit().await.unwrap();
    session.wait_for(|s| s.is_completed()).await.unwrap();
    assert_eq!(scorer.calls(), 2);
}

struct Down;

#[async_trait]
impl QuestionSource for Down {
    async fn get_questions(&self) -> Result<LoadedQuestions, ApiError> {
        Err(ApiError::Rejected("primary down".into()))
    }
}

#[async_trait]
impl Scorer for Down {
    async fn submit_quiz(&self, _: &[AnswerSlot], _: u32) -> Result<QuizResult, ApiError> {
        Err(ApiError::Rejected("primary down".into()))
    }
}

#[tokio::test(start_paused = true)]
async fn degraded_fallback_is_visible_and_scores() {
    let api = Arc::new(FallbackQuizApi::new(
        Down,
        BundledQuestionBank::from_questions(questions(2)),
    ));
    let session = QuizSession::spawn(config(300), api.clone(), api);

    let loaded = session.wait_for(|s| s.phase == Phase::Idle).await.unwrap();
    assert_eq!(
        loaded.source_status,
        SourceStatus::Degraded {
            reason: "primary down".into()
        }
    );

    session.start().await.unwrap();
    session.select_answer(1).await.unwrap();
    session.submit().await.unwrap();
    let done = session.wait_for(|s| s.is_completed()).await.unwrap();
    assert_eq!(done.result.unwrap().score, 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_discards_in_flight_submission() {
    let gate = Arc::new(Semaphore::new(0));
    let scorer = FakeScorer::gated(1, gate.clone());
    let session = idle_session(300, FakeSource::new(1), scorer.clone()).await;
    let mut updates = session.subscribe();

    session.start().await.unwrap();
    session.submit().await.unwrap();
    settle().await;
    assert_eq!(scorer.calls(), 1);

    session.shutdown();
    settle().await;
    gate.add_permits(1);
    settle().await;

    assert_eq!(scorer.completed(), 0);
    assert!(updates.borrow_and_update().is_submitting());
    assert!(updates.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn shutdown_discards_in_flight_load() {
    let gate = Arc::new(Semaphore::new(0));
    let source = FakeSource::gated(2, gate.clone());
    let session = QuizSession::spawn(config(300), source.clone(), FakeScorer::new(2));
    let mut updates = session.subscribe();
    settle().await;
    assert_eq!(source.calls(), 1);

    session.shutdown();
    settle().await;
    gate.add_permits(1);
    settle().await;

    assert_eq!(source.completed(), 0);
    assert_eq!(updates.borrow_and_update().phase, Phase::Loading);
    assert!(updates.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn dispatch_reports_whether_action_applied() {
    let session = idle_session(300, FakeSource::new(2), FakeScorer::new(2)).await;

    let next_while_idle = session.dispatch(SessionAction::Next).await.unwrap();
    assert!(!next_while_idle.applied);
    assert_eq!(next_while_idle.snapshot.phase, Phase::Idle);

    assert!(session.dispatch(SessionAction::Start).await.unwrap().applied);
    assert!(!session.dispatch(SessionAction::Start).await.unwrap().applied);

    let chosen = session.dispatch(SessionAction::SelectAnswer(2)).await.unwrap();
    assert!(chosen.applied);
    let again = session.dispatch(SessionAction::SelectAnswer(2)).await.unwrap();
    assert!(again.applied);
    assert_eq!(again.snapshot, chosen.snapshot);

    assert!(session.dispatch(SessionAction::Next).await.unwrap().applied);
    let past_end = session.dispatch(SessionAction::Next).await.unwrap();
    assert!(!past_end.applied);
    assert_eq!(past_end.snapshot.current_index, 1);

    assert!(!session.dispatch(SessionAction::Resume).await.unwrap().applied);
    assert!(!session.dispatch(SessionAction::Load).await.unwrap().applied);
}
