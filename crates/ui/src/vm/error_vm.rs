use services::{SessionSnapshot, Stage};

/// A way out of a failed session, with the command that triggers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryAction {
    RetryLoad,
    RetrySubmit,
    Resume,
    Restart,
}

impl RecoveryAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::RetryLoad => "Try Again",
            Self::RetrySubmit => "Retry submission",
            Self::Resume => "Back to the quiz",
            Self::Restart => "Start over",
        }
    }

    #[must_use]
    pub fn command(self) -> &'static str {
        match self {
            Self::RetryLoad | Self::RetrySubmit => "retry",
            Self::Resume => "resume",
            Self::Restart => "restart",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorVm {
    pub title: &'static str,
    pub message: String,
    pub actions: Vec<RecoveryAction>,
}

/// Error screen for a failed session. Returns `None` unless the session has failed.
#[must_use]
pub fn map_error_screen(snapshot: &SessionSnapshot) -> Option<ErrorVm> {
    let actions = match snapshot.failed_stage()? {
        Stage::Load => vec![RecoveryAction::RetryLoad],
        Stage::Submit if snapshot.time_left_secs > 0 => vec![
            RecoveryAction::RetrySubmit,
            RecoveryAction::Resume,
            RecoveryAction::Restart,
        ],
        Stage::Submit => vec![RecoveryAction::RetrySubmit, RecoveryAction::Restart],
    };

    Some(ErrorVm {
        title: "Something went wrong",
        message: snapshot
            .error_message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string()),
        actions,
    })
}
