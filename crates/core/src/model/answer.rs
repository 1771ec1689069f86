use std::collections::BTreeSet;

use crate::model::question::{MatchingPair, QuestionKind};

//
// ─── MATCH SET ─────────────────────────────────────────────────────────────────
//

/// Resolved prompt→answer associations for one matching question.
///
/// Two invariants hold at all times: each prompt carries at most one
/// answer, and each answer is used by at most one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    pairs: Vec<MatchingPair>,
}

impl MatchSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `answer` with `prompt`.
    ///
    /// Re-assigning a prompt replaces its previous pairing. If the answer
    /// is already attached to another prompt, that prompt loses it first.
    pub fn assign(&mut self, prompt: impl Into<String>, answer: impl Into<String>) {
        let prompt = prompt.into();
        let answer = answer.into();

        self.pairs.retain(|pair| pair.answer != answer);
        if let Some(existing) = self.pairs.iter_mut().find(|pair| pair.prompt == prompt) {
            existing.answer = answer;
        } else {
            self.pairs.push(MatchingPair { prompt, answer });
        }
    }

    /// Removes the pairing for `prompt`, if any.
    pub fn unassign(&mut self, prompt: &str) {
        self.pairs.retain(|pair| pair.prompt != prompt);
    }

    /// The answer currently assigned to `prompt`.
    #[must_use]
    pub fn answer_for(&self, prompt: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.prompt == prompt)
            .map(|pair| pair.answer.as_str())
    }

    /// True if `answer` is already attached to some prompt.
    #[must_use]
    pub fn uses_answer(&self, answer: &str) -> bool {
        self.pairs.iter().any(|pair| pair.answer == answer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchingPair> {
        self.pairs.iter()
    }

    /// Serializes each pairing as `prompt:answer`, the wire shape the
    /// presentation layer exchanges with the store.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.pairs
            .iter()
            .map(|pair| format!("{}:{}", pair.prompt, pair.answer))
            .collect()
    }

    /// Rebuilds a match set from `prompt:answer` entries.
    ///
    /// Entries fold through `assign`, so the exclusivity invariants hold
    /// even for raw input; entries without a separator are dropped.
    #[must_use]
    pub fn from_entries(entries: &[String]) -> Self {
        let mut set = Self::new();
        for entry in entries {
            if let Some((prompt, answer)) = entry.split_once(':') {
                if !prompt.is_empty() && !answer.is_empty() {
                    set.assign(prompt, answer);
                }
            }
        }
        set
    }
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// One test-taker's current response to one question.
///
/// The shape follows the question kind: a selected-option set for the
/// three option kinds, resolved pairings for matching, and the raw typed
/// string for fill-in-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Selected(BTreeSet<String>),
    Matches(MatchSet),
    Text(String),
}

impl Answer {
    /// Empty answer of the right shape for `kind`.
    #[must_use]
    pub fn empty(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse | QuestionKind::MultiSelect => {
                Self::Selected(BTreeSet::new())
            }
            QuestionKind::Matching => Self::Matches(MatchSet::new()),
            QuestionKind::FillInBlank => Self::Text(String::new()),
        }
    }

    /// Interprets a raw per-question entry array per kind.
    ///
    /// For fill-in-blank only the first entry is meaningful; the input is
    /// kept verbatim, unnormalized.
    #[must_use]
    pub fn from_entries(kind: QuestionKind, entries: &[String]) -> Self {
        match kind {
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse | QuestionKind::MultiSelect => {
                Self::Selected(entries.iter().cloned().collect())
            }
            QuestionKind::Matching => Self::Matches(MatchSet::from_entries(entries)),
            QuestionKind::FillInBlank => {
                Self::Text(entries.first().cloned().unwrap_or_default())
            }
        }
    }

    /// The per-question entry array handed to the presentation layer.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Selected(selected) => selected.iter().cloned().collect(),
            Self::Matches(matches) => matches.entries(),
            Self::Text(text) => {
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![text.clone()]
                }
            }
        }
    }

    /// True when nothing has been recorded yet.
    ///
    /// A fill-in-blank answer that is all whitespace counts as blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Selected(selected) => selected.is_empty(),
            Self::Matches(matches) => matches.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
