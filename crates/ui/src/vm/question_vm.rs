use services::SessionSnapshot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRowVm {
    pub letter: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub progress_label: String,
    pub progress_percent: u32,
    pub prompt: String,
    pub category: String,
    pub difficulty: String,
    pub options: Vec<OptionRowVm>,
    pub timer_text: String,
    pub time_warning: bool,
    pub answered_label: String,
    pub is_submitting: bool,
    pub can_go_previous: bool,
    /// Next/Submit are offered only once the current question is answered.
    pub can_proceed: bool,
    pub is_last: bool,
}

/// Letter shown for option `index`: A, B, C…
#[must_use]
pub fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

/// Inverse of [`option_letter`], case-insensitive.
#[must_use]
pub fn option_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    upper
        .is_ascii_uppercase()
        .then(|| usize::from(upper as u8 - b'A'))
}

/// Question screen for a running (or submitting) session.
///
/// Returns `None` when no question is loaded.
#[must_use]
pub fn map_question_screen(snapshot: &SessionSnapshot) -> Option<QuestionVm> {
    let question = snapshot.current_question.as_ref()?;
    let total = snapshot.total_questions.max(1);
    let number = snapshot.current_index + 1;
    let selected = snapshot.selected_answer();
    let is_submitting = snapshot.is_submitting();

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(index, text)| OptionRowVm {
            letter: option_letter(index),
            text: text.clone(),
            selected: selected == Some(index),
        })
        .collect();

    let progress_percent = u32::try_from(number * 100 / total).unwrap_or(100);

    Some(QuestionVm {
        progress_label: format!("Question {number} of {}", snapshot.total_questions),
        progress_percent,
        prompt: question.prompt().to_string(),
        category: question.category().to_string(),
        difficulty: question.difficulty().to_string(),
        options,
        timer_text: snapshot.formatted_time(),
        time_warning: snapshot.is_time_warning(),
        answered_label: format!(
            "{} of {} answered",
            snapshot.answered_count(),
            snapshot.total_questions
        ),
        is_submitting,
        can_go_previous: !snapshot.is_first() && !is_submitting,
        can_proceed: selected.is_some() && !is_submitting,
        is_last: snapshot.is_last(),
    })
}
