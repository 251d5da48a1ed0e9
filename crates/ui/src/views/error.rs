use crate::vm::ErrorVm;

#[must_use]
pub fn render_error(vm: &ErrorVm) -> String {
    let mut lines = vec![vm.title.to_string(), vm.message.clone(), String::new()];
    lines.extend(
        vm.actions
            .iter()
            .map(|action| format!("  `{}`  {}", action.command(), action.label())),
    );
    lines.join("\n")
}
