use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid point value: {0}. points must be non-negative")]
    NegativePoints(i32),
    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),
}
