use crate::vm::StartVm;

#[must_use]
pub fn render_start(vm: &StartVm) -> String {
    let mut lines = vec![
        vm.title.to_string(),
        "=".repeat(vm.title.len()),
        vm.description.to_string(),
        String::new(),
        format!("  {}  (multiple choice)", vm.questions_label),
        format!("  {}  (time limit)", vm.time_limit_label),
        format!("  {}  (minimum passing score)", vm.pass_label),
        String::new(),
        "Instructions:".to_string(),
    ];
    lines.extend(vm.instructions.iter().map(|item| format!("  - {item}")));
    if let Some(notice) = &vm.degraded_notice {
        lines.push(String::new());
        lines.push(format!("! {notice}"));
    }
    lines.push(String::new());
    lines.push("Type `start` to begin the quiz.".to_string());
    lines.join("\n")
}
