mod error_vm;
mod question_vm;
mod results_vm;
mod start_vm;
mod time_fmt;

pub use error_vm::{ErrorVm, RecoveryAction, map_error_screen};
pub use question_vm::{OptionRowVm, QuestionVm, map_question_screen, option_index, option_letter};
pub use results_vm::{
    ResultsVm, ReviewItemVm, ScoreBand, grade_message, map_results_screen, pass_label,
};
pub use start_vm::{StartVm, map_start_screen};
pub use time_fmt::format_time_limit;
