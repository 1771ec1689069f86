mod answer;
mod ids;
mod question;

pub use answer::{Answer, MatchSet};
pub use ids::{QuestionId, TestId};
pub use question::{
    MatchingPair, MatchingPairDraft, Question, QuestionDraft, QuestionError, QuestionKind,
};
