#![forbid(unsafe_code)]

pub mod model;
pub mod scoring;
pub mod status;
pub mod store;
pub mod time;

pub use time::Clock;

pub use model::{
    Answer, MatchSet, MatchingPair, Question, QuestionDraft, QuestionError, QuestionId,
    QuestionKind, TestId,
};
pub use scoring::{OptionFeedback, PairFeedback, Score};
pub use status::QuestionStatus;
pub use store::AnswerStore;
