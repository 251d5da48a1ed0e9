use thiserror::Error;

use crate::model::QuestionError;
use crate::scoring::ScoringError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
