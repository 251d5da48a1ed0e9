use quiz_core::time::TIME_WARNING_SECS;
use services::SessionSnapshot;

use crate::vm::QuestionVm;

const WARNING_NOTICE_STEP_SECS: u32 = 10;

#[must_use]
pub fn render_question(vm: &QuestionVm) -> String {
    let timer = if vm.time_warning {
        format!("[{} !]", vm.timer_text)
    } else {
        format!("[{}]", vm.timer_text)
    };
    let mut lines = vec![
        format!("{}  ({}%)  {timer}", vm.progress_label, vm.progress_percent),
        format!("{} | {} | {}", vm.category, vm.difficulty, vm.answered_label),
        String::new(),
        vm.prompt.clone(),
        String::new(),
    ];
    lines.extend(vm.options.iter().map(|option| {
        let marker = if option.selected { '*' } else { ' ' };
        format!(" {marker} {}) {}", option.letter, option.text)
    }));
    lines.push(String::new());

    if vm.is_submitting {
        lines.push("Submitting...".to_string());
        return lines.join("\n");
    }

    let mut hints = Vec::new();
    if vm.can_go_previous {
        hints.push("`p` previous");
    }
    if vm.can_proceed {
        hints.push(if vm.is_last { "`submit` submit quiz" } else { "`n` next" });
    } else {
        hints.push("pick a letter to answer");
    }
    lines.push(hints.join(" | "));
    lines.join("\n")
}

/// One-line countdown update, emitted each minute and every ten seconds
/// inside the warning window.
#[must_use]
pub fn render_timer_notice(snapshot: &SessionSnapshot) -> Option<String> {
    let left = snapshot.time_left_secs;
    if !snapshot.is_running() || left == 0 {
        return None;
    }
    let warning = left <= TIME_WARNING_SECS;
    let due = left % 60 == 0 || (warning && left % WARNING_NOTICE_STEP_SECS == 0);
    due.then(|| {
        let suffix = if warning { " - hurry up!" } else { "" };
        format!("Time left: {}{suffix}", snapshot.formatted_time())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::snapshot;
    use crate::vm::map_question_screen;
    use services::Phase;

    #[test]
    fn unanswered_question_asks_for_a_letter() {
        let text = render_question(&map_question_screen(&snapshot(Phase::Running, 2)).unwrap());

        assert!(text.starts_with("Question 1 of 2  (50%)  [05:00]"));
        assert!(text.contains("   B) GET"));
        assert!(text.ends_with("pick a letter to answer"));
    }

    #[test]
    fn last_answered_question_offers_submit() {
        let mut snap = snapshot(Phase::Running, 2);
        snap.current_index = 1;
        snap.answers.set(1, 1);
        snap.time_left_secs = 42;

        let text = render_question(&map_question_screen(&snap).unwrap());

        assert!(text.contains("[00:42 !]"));
        assert!(text.contains(" * B) GET"));
        assert!(text.ends_with("`p` previous | `submit` submit quiz"));
    }

    #[test]
    fn submitting_hides_navigation() {
        let text = render_question(&map_question_screen(&snapshot(Phase::Submitting, 1)).unwrap());
        assert!(text.ends_with("Submitting..."));
    }

    #[test]
    fn timer_notices_each_minute_then_every_ten_seconds() {
        let mut snap = snapshot(Phase::Running, 1);
        let notice_at = |snap: &mut SessionSnapshot, left| {
            snap.time_left_secs = left;
            render_timer_notice(snap)
        };

        assert_eq!(notice_at(&mut snap, 240).as_deref(), Some("Time left: 04:00"));
        assert_eq!(notice_at(&mut snap, 239), None);
        assert_eq!(notice_at(&mut snap, 70), None);
        assert_eq!(
            notice_at(&mut snap, 30).as_deref(),
            Some("Time left: 00:30 - hurry up!")
        );
        assert_eq!(notice_at(&mut snap, 0), None);
    }

    #[test]
    fn no_timer_notice_unless_running() {
        let mut snap = snapshot(Phase::Idle, 1);
        snap.time_left_secs = 120;
        assert_eq!(render_timer_notice(&snap), None);
    }
}
