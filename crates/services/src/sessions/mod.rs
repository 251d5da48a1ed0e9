mod snapshot;
mod state;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use snapshot::SessionSnapshot;
pub use state::{Phase, SessionState, Stage, Submission, TickOutcome};
pub use timer::TICK_PERIOD;
pub use workflow::{ActionOutcome, QuizSession, SessionAction};
