use crate::vm::ResultsVm;

#[must_use]
pub fn render_results(vm: &ResultsVm) -> String {
    let mut lines = vec![
        format!("{}  {}", vm.percentage_label, vm.grade_message),
        format!(
            "Score: {} ({})  |  {}  |  Time taken: {}",
            vm.score_label,
            vm.band.label(),
            vm.pass_label,
            vm.time_label
        ),
    ];
    if vm.unanswered > 0 {
        lines.push(format!("Unanswered: {}", vm.unanswered));
    }
    lines.push(String::new());
    lines.push("Question Review".to_string());

    for item in &vm.review {
        let mark = if item.is_correct { "correct" } else { "wrong" };
        lines.push(String::new());
        lines.push(format!("{}. {} [{mark}]", item.number, item.prompt));
        lines.push(format!("   Your answer: {}", item.your_answer));
        if let Some(correct) = &item.correct_answer {
            lines.push(format!("   Correct answer: {correct}"));
        }
        if !item.explanation.is_empty() {
            lines.push(format!("   Explanation: {}", item.explanation));
        }
    }

    lines.push(String::new());
    lines.push("Type `restart` to take the quiz again, or `quit`.".to_string());
    lines.join("\n")
}
