use quiz_core::scoring::PASSING_THRESHOLD_PERCENT;
use services::{SessionSnapshot, SourceStatus};

use crate::vm::time_fmt::format_time_limit;

const TITLE: &str = "Full-Stack Development Quiz";
const DESCRIPTION: &str = "Test your knowledge of full-stack development concepts including \
React, Node.js, databases, and web technologies.";

const INSTRUCTIONS: [&str; 5] = [
    "Read each question carefully before selecting your answer",
    "You can navigate between questions using Previous/Next",
    "Make sure to answer all questions before submitting",
    "The quiz will auto-submit when time runs out",
    "You'll see detailed results after completion",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartVm {
    pub title: &'static str,
    pub description: &'static str,
    pub questions_label: String,
    pub time_limit_label: String,
    pub pass_label: String,
    pub instructions: &'static [&'static str],
    pub degraded_notice: Option<String>,
}

#[must_use]
pub fn map_start_screen(snapshot: &SessionSnapshot) -> StartVm {
    let questions_label = match snapshot.total_questions {
        1 => "1 Question".to_string(),
        n => format!("{n} Questions"),
    };
    let degraded_notice = match &snapshot.source_status {
        SourceStatus::Healthy => None,
        SourceStatus::Degraded { reason } => Some(format!(
            "Quiz service unavailable ({reason}); using the built-in questions."
        )),
    };

    StartVm {
        title: TITLE,
        description: DESCRIPTION,
        questions_label,
        time_limit_label: format_time_limit(snapshot.time_limit_secs),
        pass_label: format!("{PASSING_THRESHOLD_PERCENT}% to Pass"),
        instructions: &INSTRUCTIONS,
        degraded_notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::snapshot;
    use services::Phase;

    #[test]
    fn start_screen_lists_quiz_facts() {
        let vm = map_start_screen(&snapshot(Phase::Idle, 10));

        assert_eq!(vm.questions_label, "10 Questions");
        assert_eq!(vm.time_limit_label, "5 Minutes");
        assert_eq!(vm.pass_label, "60% to Pass");
        assert_eq!(vm.instructions.len(), 5);
        assert!(vm.degraded_notice.is_none());
    }

    #[test]
    fn degraded_source_is_announced() {
        let mut snap = snapshot(Phase::Idle, 1);
        snap.source_status = SourceStatus::Degraded {
            reason: "connection refused".into(),
        };

        let vm = map_start_screen(&snap);

        assert_eq!(vm.questions_label, "1 Question");
        assert!(vm.degraded_notice.unwrap().contains("connection refused"));
    }
}
