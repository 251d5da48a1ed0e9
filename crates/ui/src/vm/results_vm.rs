use quiz_core::time::format_elapsed;
use quiz_core::{QuestionReview, QuizResult};

use crate::vm::question_vm::option_letter;

const NOT_ANSWERED: &str = "Not answered";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Poor,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

#[must_use]
pub fn grade_message(percentage: u32) -> &'static str {
    match percentage {
        90.. => "Outstanding!",
        80..=89 => "Excellent work!",
        70..=79 => "Great job!",
        60..=69 => "Good effort!",
        50..=59 => "Keep practicing!",
        _ => "More study needed!",
    }
}

#[must_use]
pub fn pass_label(passed: bool) -> &'static str {
    if passed { "Passed" } else { "Failed" }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItemVm {
    pub number: usize,
    pub prompt: String,
    pub category: String,
    pub is_correct: bool,
    pub your_answer: String,
    /// Present only when the answer was wrong or missing.
    pub correct_answer: Option<String>,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub percentage_label: String,
    pub score_label: String,
    pub grade_message: &'static str,
    pub band: ScoreBand,
    pub passed: bool,
    pub pass_label: &'static str,
    pub time_label: String,
    pub unanswered: usize,
    pub review: Vec<ReviewItemVm>,
}

fn answer_line(index: usize, text: Option<&str>) -> String {
    format!("{} - {}", option_letter(index), text.unwrap_or_default())
}

fn map_review_item(number: usize, detail: &QuestionReview) -> ReviewItemVm {
    let your_answer = detail.chosen.map_or_else(
        || NOT_ANSWERED.to_string(),
        |index| answer_line(index, detail.chosen_text()),
    );
    let correct_answer = (!detail.is_correct)
        .then(|| answer_line(detail.correct_answer, detail.correct_text()));

    ReviewItemVm {
        number,
        prompt: detail.prompt.clone(),
        category: detail.category.clone(),
        is_correct: detail.is_correct,
        your_answer,
        correct_answer,
        explanation: detail.explanation.clone(),
    }
}

#[must_use]
pub fn map_results_screen(result: &QuizResult) -> ResultsVm {
    ResultsVm {
        percentage_label: format!("{}%", result.percentage),
        score_label: format!("{}/{}", result.correct_details(), result.total_questions),
        grade_message: grade_message(result.percentage),
        band: ScoreBand::from_percentage(result.percentage),
        passed: result.passed,
        pass_label: pass_label(result.passed),
        time_label: format_elapsed(result.time_spent_secs),
        unanswered: result.unanswered(),
        review: result
            .details
            .iter()
            .enumerate()
            .map(|(index, detail)| map_review_item(index + 1, detail))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::QuestionId;

    fn detail(id: u64, chosen: Option<usize>, correct: usize) -> QuestionReview {
        QuestionReview {
            question_id: QuestionId::new(id),
            prompt: format!("Question {id}?"),
            options: vec!["POST".into(), "GET".into(), "PUT".into()],
            chosen,
            correct_answer: correct,
            is_correct: chosen == Some(correct),
            explanation: "GET retrieves data.".into(),
            category: "backend".into(),
        }
    }

    fn result(details: Vec<QuestionReview>, percentage: u32, time: u32) -> QuizResult {
        let score = details.iter().filter(|d| d.is_correct).count() as u32;
        QuizResult {
            score,
            total_questions: details.len() as u32,
            percentage,
            passed: percentage >= 60,
            time_spent_secs: time,
            details,
        }
    }

    #[test]
    fn grade_messages_follow_bands() {
        assert_eq!(grade_message(100), "Outstanding!");
        assert_eq!(grade_message(90), "Outstanding!");
        assert_eq!(grade_message(89), "Excellent work!");
        assert_eq!(grade_message(70), "Great job!");
        assert_eq!(grade_message(60), "Good effort!");
        assert_eq!(grade_message(50), "Keep practicing!");
        assert_eq!(grade_message(49), "More study needed!");
    }

    #[test]
    fn score_bands() {
        assert_eq!(ScoreBand::from_percentage(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percentage(79), ScoreBand::Good);
        assert_eq!(ScoreBand::from_percentage(40), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_percentage(39).label(), "poor");
    }

    #[test]
    fn results_summary_labels() {
        let vm = map_results_screen(&result(
            vec![detail(1, Some(1), 1), detail(2, Some(0), 1)],
            50,
            125,
        ));

        assert_eq!(vm.percentage_label, "50%");
        assert_eq!(vm.score_label, "1/2");
        assert_eq!(vm.pass_label, "Failed");
        assert_eq!(vm.time_label, "2m 5s");
        assert_eq!(vm.band, ScoreBand::Fair);
    }

    #[test]
    fn review_shows_correct_answer_only_when_wrong() {
        let vm = map_results_screen(&result(
            vec![detail(1, Some(1), 1), detail(2, Some(2), 1)],
            50,
            10,
        ));

        assert_eq!(vm.review[0].your_answer, "B - GET");
        assert_eq!(vm.review[0].correct_answer, None);
        assert_eq!(vm.review[1].your_answer, "C - PUT");
        assert_eq!(vm.review[1].correct_answer.as_deref(), Some("B - GET"));
        assert_eq!(vm.review[1].number, 2);
    }

    #[test]
    fn unanswered_is_not_option_a() {
        let vm = map_results_screen(&result(vec![detail(1, None, 0)], 0, 300));

        assert_eq!(vm.review[0].your_answer, "Not answered");
        assert!(!vm.review[0].is_correct);
        assert_eq!(vm.review[0].correct_answer.as_deref(), Some("A - POST"));
        assert_eq!(vm.unanswered, 1);
    }
}
