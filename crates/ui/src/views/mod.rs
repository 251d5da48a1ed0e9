mod error;
mod question;
mod results;
mod start;

use services::{Phase, SessionSnapshot};

use crate::vm::{
    ErrorVm, QuestionVm, ResultsVm, StartVm, map_error_screen, map_question_screen,
    map_results_screen, map_start_screen,
};

pub use error::render_error;
pub use question::{render_question, render_timer_notice};
pub use results::render_results;
pub use start::render_start;

/// What the terminal should show for a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Start(StartVm),
    Question(QuestionVm),
    Results(ResultsVm),
    Error(ErrorVm),
}

impl Screen {
    #[must_use]
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let screen = match snapshot.phase {
            Phase::Loading => None,
            Phase::Idle => Some(Self::Start(map_start_screen(snapshot))),
            Phase::Running | Phase::Submitting => {
                map_question_screen(snapshot).map(Self::Question)
            }
            Phase::Completed => snapshot
                .result
                .as_ref()
                .map(|result| Self::Results(map_results_screen(result))),
            Phase::Failed(_) => map_error_screen(snapshot).map(Self::Error),
        };
        screen.unwrap_or(Self::Loading)
    }

    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Loading => "Loading quiz questions...".to_string(),
            Self::Start(vm) => render_start(vm),
            Self::Question(vm) => render_question(vm),
            Self::Results(vm) => render_results(vm),
            Self::Error(vm) => render_error(vm),
        }
    }
}
