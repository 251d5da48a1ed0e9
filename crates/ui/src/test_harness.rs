use quiz_core::{AnswerSheet, Question, QuestionId};
use services::{Phase, SessionSnapshot, SourceStatus};

pub(crate) fn question(id: u64) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Question {id}?"),
        vec!["POST".into(), "GET".into(), "PUT".into(), "DELETE".into()],
        1,
        "backend",
        "easy",
        "GET retrieves data.",
    )
    .unwrap()
}

pub(crate) fn snapshot(phase: Phase, total: usize) -> SessionSnapshot {
    SessionSnapshot {
        phase,
        current_index: 0,
        total_questions: total,
        current_question: (total > 0).then(|| question(1)),
        answers: AnswerSheet::unanswered(total),
        time_left_secs: 300,
        time_limit_secs: 300,
        result: None,
        error_message: None,
        source_status: SourceStatus::Healthy,
    }
}
