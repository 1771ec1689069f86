//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuestionId;

/// Errors emitted by `TestSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("attempt already submitted; answers are frozen")]
    Submitted,
    #[error("question {0} is not part of this test")]
    UnknownQuestion(QuestionId),
}
