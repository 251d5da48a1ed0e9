/// Default quiz time limit (5 minutes).
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;

/// Remaining time at or below which consumers should warn the user.
pub const TIME_WARNING_SECS: u32 = 60;

/// Formats whole seconds as zero-padded `MM:SS`.
///
/// Minutes are not clamped: an hour renders as `60:00`.
#[must_use]
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Formats whole seconds as `Xm Ys`, the way time spent is reported after a quiz.
#[must_use]
pub fn format_elapsed(seconds: u32) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// True once the countdown enters the warning window.
#[must_use]
pub fn is_time_warning(time_left_secs: u32) -> bool {
    time_left_secs <= TIME_WARNING_SECS
}
