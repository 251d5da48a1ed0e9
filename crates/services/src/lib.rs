#![forbid(unsafe_code)]

pub mod bank;
pub mod config;
pub mod error;
pub mod fallback;
pub mod http_api;
pub mod scorer;
pub mod sessions;
pub mod source;

pub use sessions as session;

pub use bank::BundledQuestionBank;
pub use config::{QuizApiConfig, SessionConfig};
pub use error::{ApiError, ConfigError, QuizError, SessionClosed};
pub use fallback::FallbackQuizApi;
pub use http_api::HttpQuizApi;
pub use scorer::Scorer;
pub use source::{LoadedQuestions, QuestionSource, SourceStatus};

pub use sessions::{ActionOutcome, Phase, QuizSession, SessionAction, SessionSnapshot, Stage};
