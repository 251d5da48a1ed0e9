use quiz_core::time::format_elapsed;

/// Time limit as shown on the start screen: "5 Minutes", "1 Minute" or "1m 30s".
#[must_use]
pub fn format_time_limit(seconds: u32) -> String {
    match (seconds / 60, seconds % 60) {
        (1, 0) => "1 Minute".to_string(),
        (minutes, 0) if minutes > 0 => format!("{minutes} Minutes"),
        _ => format_elapsed(seconds),
    }
}
