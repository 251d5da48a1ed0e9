use std::future::Future;
use std::sync::Arc;

use quiz_core::QuizResult;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::{ApiError, SessionClosed};
use crate::scorer::Scorer;
use crate::source::{LoadedQuestions, QuestionSource};

use super::snapshot::SessionSnapshot;
use super::state::{Phase, SessionState, TickOutcome};
use super::timer::Countdown;

const COMMAND_BUFFER: usize = 32;

/// User intents accepted by a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Fetch questions. Only honored before the first successful load or after a load failure.
    Load,
    Start,
    SelectAnswer(usize),
    Next,
    Previous,
    /// Submit now, or retry a failed submission.
    Submit,
    /// Go back to answering after a failed submission.
    Resume,
    /// Start over with the loaded questions.
    Restart,
}

/// Internal inputs produced by the countdown and by request tasks.
#[derive(Debug)]
pub(crate) enum Event {
    Tick {
        generation: u64,
    },
    Loaded {
        ticket: u64,
        outcome: Result<LoadedQuestions, ApiError>,
    },
    Scored {
        ticket: u64,
        outcome: Result<QuizResult, ApiError>,
    },
}

/// Reply to a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// False when the action was not valid in the current phase and nothing changed.
    pub applied: bool,
    pub snapshot: SessionSnapshot,
}

struct Command {
    action: SessionAction,
    reply: oneshot::Sender<ActionOutcome>,
}

//
// ─── HANDLE ────────────────────────────────────────────────────────────────────
//

/// Handle to a quiz session running on its own task.
///
/// The session owns its countdown and any request in flight. Dropping the handle
/// (or calling [`QuizSession::shutdown`]) stops all of them, and responses that
/// arrive afterwards are discarded.
#[derive(Debug)]
pub struct QuizSession {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    driver: JoinHandle<()>,
}

impl QuizSession {
    /// Spawn a session and begin loading questions immediately.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(
        config: SessionConfig,
        source: Arc<dyn QuestionSource>,
        scorer: Arc<dyn Scorer>,
    ) -> Self {
        let state = SessionState::new(config);
        let (snapshot_tx, snapshots) = watch::channel(state.snapshot());
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (events_tx, event_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            state,
            source,
            scorer,
            events: events_tx,
            snapshots: snapshot_tx,
            countdown: None,
            next_generation: 0,
            request: None,
        };
        let driver = tokio::spawn(driver.run(command_rx, event_rx));

        Self {
            commands,
            snapshots,
            driver,
        }
    }

    /// Apply `action` and report whether it took effect, with the resulting snapshot.
    ///
    /// Actions that are not valid in the current phase leave the session unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn dispatch(&self, action: SessionAction) -> Result<ActionOutcome, SessionClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command { action, reply })
            .await
            .map_err(|_| SessionClosed)?;
        response.await.map_err(|_| SessionClosed)
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn load(&self) -> Result<SessionSnapshot, SessionClosed> {
        self.snapshot_after(SessionAction::Load).await
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn start(&self) -> Result<SessionSnapshot, SessionClosed> {
        self.snapshot_after(SessionAction::Start).await
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn select_answer(&self, index: usize) -> Result<SessionSnapshot, SessionClosed> {
        self.snapshot_after(SessionAction::SelectAnswer(index)).await
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn next(&self) -> Result<SessionSnapshot, SessionClosed> {
        self.snapshot_after(SessionAction::Next).await
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn previous(&self) -> Result<SessionSnapshot, SessionClosed> {
        self.snapshot_after(SessionAction::Previous).await
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn submit(&self) -> Result<SessionSnapshot, SessionClosed> {
        self.snapshot_after(SessionAction::Submit).await
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn resume(&self) -> Result<SessionSnapshot, SessionClosed> {
        self.snapshot_after(SessionAction::Resume).await
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn restart(&self) -> Result<SessionSnapshot, SessionClosed> {
        self.snapshot_after(SessionAction::Restart).await
    }

    async fn snapshot_after(&self, action: SessionAction) -> Result<SessionSnapshot, SessionClosed> {
        self.dispatch(action).await.map(|outcome| outcome.snapshot)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified whenever the snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session stops first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot, SessionClosed> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| SessionClosed)?
            .clone();
        Ok(snapshot)
    }

    /// Stop the session, its countdown and any request in flight.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

//
// ─── DRIVER ────────────────────────────────────────────────────────────────────
//

/// A spawned collaborator call. Dropping it cancels the call.
struct RequestTask(JoinHandle<()>);

impl RequestTask {
    fn spawn(future: impl Future<Output = ()> + Send + 'static) -> Self {
        Self(tokio::spawn(future))
    }
}

impl Drop for RequestTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

struct Driver {
    state: SessionState,
    source: Arc<dyn QuestionSource>,
    scorer: Arc<dyn Scorer>,
    events: UnboundedSender<Event>,
    snapshots: watch::Sender<SessionSnapshot>,
    countdown: Option<Countdown>,
    next_generation: u64,
    request: Option<RequestTask>,
}

impl Driver {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        self.apply(SessionAction::Load);
        self.publish();

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(Command { action, reply }) = command else {
                        break;
                    };
                    let applied = self.apply(action);
                    let snapshot = self.publish();
                    let _ = reply.send(ActionOutcome { applied, snapshot });
                }
                Some(event) = events.recv() => {
                    self.handle(event);
                    self.publish();
                }
            }
        }
        debug!("quiz session stopped");
    }

    fn apply(&mut self, action: SessionAction) -> bool {
        debug!(?action, phase = ?self.state.phase(), "session action");
        let applied = match action {
            SessionAction::Load => self.begin_load(),
            SessionAction::Start => self.state.start(),
            SessionAction::SelectAnswer(index) => self.state.select_answer(index),
            SessionAction::Next => self.state.next(),
            SessionAction::Previous => self.state.previous(),
            SessionAction::Submit => self.begin_submit(),
            SessionAction::Resume => self.state.resume(),
            SessionAction::Restart => self.state.restart(),
        };
        if !applied {
            debug!(?action, "action ignored in this phase");
        }
        self.sync_countdown();
        applied
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Tick { generation } => {
                let current = self.countdown.as_ref().map(Countdown::generation);
                if current != Some(generation) {
                    debug!(generation, "dropping tick from a stopped countdown");
                    return;
                }
                if self.state.tick() == TickOutcome::Expired {
                    info!("time is up, submitting automatically");
                    self.begin_submit();
                }
            }
            Event::Loaded { ticket, outcome } => {
                if self.state.finish_load(ticket, outcome) {
                    self.request = None;
                }
            }
            Event::Scored { ticket, outcome } => {
                if self.state.finish_submit(ticket, outcome) {
                    self.request = None;
                }
            }
        }
        self.sync_countdown();
    }

    fn begin_load(&mut self) -> bool {
        let Some(ticket) = self.state.begin_load() else {
            return false;
        };
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        self.request = Some(RequestTask::spawn(async move {
            let outcome = source.get_questions().await;
            let _ = events.send(Event::Loaded { ticket, outcome });
        }));
        true
    }

    fn begin_submit(&mut self) -> bool {
        let Some(submission) = self.state.begin_submit() else {
            return false;
        };
        let scorer = Arc::clone(&self.scorer);
        let events = self.events.clone();
        self.request = Some(RequestTask::spawn(async move {
            let outcome = scorer
                .submit_quiz(&submission.answers, submission.time_spent_secs)
                .await;
            let _ = events.send(Event::Scored {
                ticket: submission.ticket,
                outcome,
            });
        }));
        true
    }

    /// Keep exactly one countdown alive while running, and none otherwise.
    fn sync_countdown(&mut self) {
        let running = self.state.phase() == Phase::Running;
        match (running, self.countdown.is_some()) {
            (true, false) => {
                self.next_generation += 1;
                self.countdown = Some(Countdown::start(self.next_generation, self.events.clone()));
            }
            (false, true) => self.countdown = None,
            _ => {}
        }
    }

    fn publish(&self) -> SessionSnapshot {
        let snapshot = self.state.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot.clone();
                true
            }
        });
        snapshot
    }
}
