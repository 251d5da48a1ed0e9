mod answer;
mod ids;
mod question;
mod result;

pub use answer::{AnswerSheet, AnswerSlot};
pub use ids::{ParseIdError, QuestionId};
pub use question::{MIN_OPTIONS, Question, QuestionError};
pub use result::{QuestionReview, QuizResult};
