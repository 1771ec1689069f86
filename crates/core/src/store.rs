use std::collections::HashMap;

use crate::model::{Answer, MatchSet, Question, QuestionId, QuestionKind};

/// In-memory mapping from question identity to the test-taker's current
/// response.
///
/// The store interprets raw input per question kind but knows nothing
/// about submission state; freezing after submit is the session's
/// contract, enforced above this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    answers: HashMap<QuestionId, Answer>,
}

impl AnswerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current answer for `question` with the given raw
    /// entry array.
    ///
    /// Matching entries fold through [`MatchSet::assign`], so the
    /// answer-exclusivity rules hold even for raw input.
    pub fn set(&mut self, question: &Question, entries: &[String]) {
        let answer = Answer::from_entries(question.kind(), entries);
        self.answers.insert(question.id().clone(), answer);
    }

    /// Associates `answer` with `prompt` on a matching question.
    ///
    /// An answer already used by another prompt is moved here; has no
    /// effect on non-matching questions.
    pub fn assign_match(&mut self, question: &Question, prompt: &str, answer: &str) {
        if question.kind() != QuestionKind::Matching {
            return;
        }
        let entry = self
            .answers
            .entry(question.id().clone())
            .or_insert_with(|| Answer::Matches(MatchSet::new()));
        if let Answer::Matches(matches) = entry {
            matches.assign(prompt, answer);
        }
    }

    /// Removes the pairing for `prompt` on a matching question.
    pub fn clear_match(&mut self, question: &Question, prompt: &str) {
        if question.kind() != QuestionKind::Matching {
            return;
        }
        if let Some(Answer::Matches(matches)) = self.answers.get_mut(question.id()) {
            matches.unassign(prompt);
        }
    }

    /// The recorded answer for a question, if any.
    #[must_use]
    pub fn answer(&self, id: &QuestionId) -> Option<&Answer> {
        self.answers.get(id)
    }

    /// The display entry array for a question; empty when nothing has
    /// been recorded.
    #[must_use]
    pub fn entries(&self, id: &QuestionId) -> Vec<String> {
        self.answers.get(id).map(Answer::entries).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Discards every recorded answer.
    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
