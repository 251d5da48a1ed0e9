//! Shared error types for the services crate.

use thiserror::Error;

/// Failures reported by a question source or a scorer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("quiz API responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("{0}")]
    Rejected(String),
    #[error("no questions available")]
    Empty,
    #[error(transparent)]
    Domain(#[from] quiz_core::Error),
}

impl From<quiz_core::model::QuestionError> for ApiError {
    fn from(err: quiz_core::model::QuestionError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<quiz_core::scoring::ScoringError> for ApiError {
    fn from(err: quiz_core::scoring::ScoringError) -> Self {
        Self::Domain(err.into())
    }
}

/// Error captured on a quiz session. Its display text is what users see.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("Failed to load questions: {0}")]
    Load(#[source] ApiError),
    #[error("Failed to submit quiz: {0}")]
    Submit(#[source] ApiError),
}

/// Returned by `QuizSession` methods once the session has been torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quiz session has shut down")]
pub struct SessionClosed;

/// Errors raised while building configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("time limit must be at least 1 second")]
    InvalidTimeLimit,
    #[error("invalid quiz API url {raw:?}: {source}")]
    InvalidApiUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("quiz API url must use http or https, got {scheme:?}")]
    UnsupportedScheme { scheme: String },
    #[error("invalid request timeout {raw:?}")]
    InvalidTimeout { raw: String },
}
