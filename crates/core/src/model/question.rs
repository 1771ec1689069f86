use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// The five supported question variants.
///
/// The serialized tags (`mcq`, `tf`, `ms`, `matching`, `fib`) match the
/// import payload and the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    MultipleChoice,
    #[serde(rename = "tf")]
    TrueFalse,
    #[serde(rename = "ms")]
    MultiSelect,
    #[serde(rename = "matching")]
    Matching,
    #[serde(rename = "fib")]
    FillInBlank,
}

pub const KIND_TAGS: [&str; 5] = ["mcq", "tf", "ms", "matching", "fib"];

impl QuestionKind {
    /// Parses a kind from its serialized tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "mcq" => Some(Self::MultipleChoice),
            "tf" => Some(Self::TrueFalse),
            "ms" => Some(Self::MultiSelect),
            "matching" => Some(Self::Matching),
            "fib" => Some(Self::FillInBlank),
            _ => None,
        }
    }

    /// The serialized tag for this kind.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "mcq",
            Self::TrueFalse => "tf",
            Self::MultiSelect => "ms",
            Self::Matching => "matching",
            Self::FillInBlank => "fib",
        }
    }

    /// Human-readable label for UI display.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "Multiple Choice",
            Self::TrueFalse => "True / False",
            Self::MultiSelect => "Multiple Select",
            Self::Matching => "Matching",
            Self::FillInBlank => "Fill in Blank",
        }
    }

    /// True for the kinds answered by selecting from `options`.
    #[must_use]
    pub fn uses_options(&self) -> bool {
        matches!(
            self,
            Self::MultipleChoice | Self::TrueFalse | Self::MultiSelect
        )
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

//
// ─── MATCHING PAIR ─────────────────────────────────────────────────────────────
//

/// One prompt/answer pairing of a matching question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub prompt: String,
    pub answer: String,
}

impl MatchingPair {
    #[must_use]
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A structurally valid question.
///
/// Exactly one of `options` + `correct_answers` or `matching_pairs` is
/// active depending on `kind`; the inactive fields are always empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    kind: QuestionKind,
    options: Vec<String>,
    correct_answers: Vec<String>,
    matching_pairs: Vec<MatchingPair>,
}

impl Question {
    /// Builds a question, enforcing the per-kind structural rules.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::Invalid` carrying every violated rule.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        kind: QuestionKind,
        options: Vec<String>,
        correct_answers: Vec<String>,
        matching_pairs: Vec<MatchingPair>,
    ) -> Result<Self, QuestionError> {
        let draft = QuestionDraft {
            id: Some(id.as_str().to_owned()),
            text: Some(text.into()),
            kind: Some(kind.tag().to_owned()),
            options,
            correct_answers: Some(correct_answers),
            matching_pairs: Some(
                draft_pairs_from_matching(&matching_pairs),
            ),
        };
        draft
            .validate(1)
            .map_err(|violations| QuestionError::Invalid { violations })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answers(&self) -> &[String] {
        &self.correct_answers
    }

    #[must_use]
    pub fn matching_pairs(&self) -> &[MatchingPair] {
        &self.matching_pairs
    }
}

fn draft_pairs_from_matching(pairs: &[MatchingPair]) -> Vec<MatchingPairDraft> {
    pairs
        .iter()
        .map(|p| MatchingPairDraft {
            prompt: Some(p.prompt.clone()),
            answer: Some(p.answer.clone()),
        })
        .collect()
}

//
// ─── QUESTION ERRORS ───────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("structurally invalid question: {}", violations.join("; "))]
    Invalid { violations: Vec<String> },
}

//
// ─── QUESTION DRAFT ────────────────────────────────────────────────────────────
//

/// Raw candidate question record, as found in an import payload.
///
/// Every field is optional so that missing pieces surface as collected
/// violations rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answers: Option<Vec<String>>,
    pub matching_pairs: Option<Vec<MatchingPairDraft>>,
}

/// Raw candidate pairing inside a matching question draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MatchingPairDraft {
    pub prompt: Option<String>,
    pub answer: Option<String>,
}

impl QuestionDraft {
    /// Collects every structural violation of this draft.
    ///
    /// `number` is the 1-based position used in the reported messages.
    /// All rules are evaluated independently; nothing short-circuits
    /// except per-kind checks when the kind tag itself is unknown.
    #[must_use]
    pub fn violations(&self, number: usize) -> Vec<String> {
        let mut errors = Vec::new();

        if self.id.as_deref().unwrap_or("").is_empty() {
            errors.push(format!("Question {number}: Missing \"id\" field"));
        }
        if self.text.as_deref().unwrap_or("").is_empty() {
            errors.push(format!("Question {number}: Missing \"text\" field"));
        }
        if self.kind.as_deref().unwrap_or("").is_empty() {
            errors.push(format!("Question {number}: Missing \"type\" field"));
        }
        if self.correct_answers.is_none() {
            errors.push(format!(
                "Question {number}: Missing or invalid \"correctAnswers\" field (must be an array)"
            ));
        }

        let kind = match self.kind.as_deref() {
            Some(tag) if !tag.is_empty() => match QuestionKind::from_tag(tag) {
                Some(kind) => Some(kind),
                None => {
                    errors.push(format!(
                        "Question {number}: Invalid type \"{tag}\". Must be one of: {}",
                        KIND_TAGS.join(", ")
                    ));
                    None
                }
            },
            _ => None,
        };

        if let Some(kind) = kind {
            self.kind_violations(kind, number, &mut errors);
        }

        errors
    }

    fn kind_violations(&self, kind: QuestionKind, number: usize, errors: &mut Vec<String>) {
        match kind {
            QuestionKind::MultipleChoice => {
                if self.options.len() < 2 {
                    errors.push(format!(
                        "Question {number} (MCQ): Must have at least 2 options"
                    ));
                }
                if let Some(correct) = &self.correct_answers {
                    if correct.len() != 1 {
                        errors.push(format!(
                            "Question {number} (MCQ): Must have exactly 1 correct answer"
                        ));
                    }
                }
            }
            QuestionKind::TrueFalse => {
                if self.options.len() != 2 {
                    errors.push(format!(
                        "Question {number} (True/False): Must have exactly 2 options (True, False)"
                    ));
                }
                if let Some(correct) = &self.correct_answers {
                    if correct.len() != 1 {
                        errors.push(format!(
                            "Question {number} (True/False): Must have exactly 1 correct answer"
                        ));
                    }
                    if !correct
                        .first()
                        .is_some_and(|a| matches!(a.as_str(), "True" | "False"))
                    {
                        errors.push(format!(
                            "Question {number} (True/False): Correct answer must be \"True\" or \"False\""
                        ));
                    }
                }
            }
            QuestionKind::MultiSelect => {
                if self.options.len() < 2 {
                    errors.push(format!(
                        "Question {number} (Multiple Select): Must have at least 2 options"
                    ));
                }
                if let Some(correct) = &self.correct_answers {
                    if correct.is_empty() {
                        errors.push(format!(
                            "Question {number} (Multiple Select): Must have at least 1 correct answer"
                        ));
                    }
                }
            }
            QuestionKind::Matching => {
                let pairs = self.matching_pairs.as_deref().unwrap_or(&[]);
                if pairs.len() < 2 {
                    errors.push(format!(
                        "Question {number} (Matching): Must have at least 2 matching pairs"
                    ));
                }
                for (index, pair) in pairs.iter().enumerate() {
                    let pair_number = index + 1;
                    if pair.prompt.as_deref().unwrap_or("").is_empty() {
                        errors.push(format!(
                            "Question {number} (Matching): Pair {pair_number} is missing \"prompt\""
                        ));
                    }
                    if pair.answer.as_deref().unwrap_or("").is_empty() {
                        errors.push(format!(
                            "Question {number} (Matching): Pair {pair_number} is missing \"answer\""
                        ));
                    }
                }
            }
            QuestionKind::FillInBlank => {
                if self.correct_answers.as_deref().unwrap_or(&[]).is_empty() {
                    errors.push(format!(
                        "Question {number} (Fill-in-the-Blank): Must have at least 1 correct answer"
                    ));
                }
            }
        }
    }

    /// Validates the draft and converts it into a trusted `Question`.
    ///
    /// Inactive fields for the kind are normalized to empty, so a trusted
    /// question never carries both an option list and matching pairs.
    ///
    /// # Errors
    ///
    /// Returns the full list of violations when any rule fails.
    pub fn validate(self, number: usize) -> Result<Question, Vec<String>> {
        let violations = self.violations(number);
        if !violations.is_empty() {
            return Err(violations);
        }

        // violations() guarantees these are present and well-formed
        let id = QuestionId::new(self.id.unwrap_or_default());
        let text = self.text.unwrap_or_default();
        let kind = self
            .kind
            .as_deref()
            .and_then(QuestionKind::from_tag)
            .expect("validated draft has a known kind");

        let (options, correct_answers, matching_pairs) = if kind == QuestionKind::Matching {
            let pairs = self
                .matching_pairs
                .unwrap_or_default()
                .into_iter()
                .map(|p| MatchingPair {
                    prompt: p.prompt.unwrap_or_default(),
                    answer: p.answer.unwrap_or_default(),
                })
                .collect();
            (Vec::new(), Vec::new(), pairs)
        } else {
            (
                self.options,
                self.correct_answers.unwrap_or_default(),
                Vec::new(),
            )
        };

        Ok(Question {
            id,
            text,
            kind,
            options,
            correct_answers,
            matching_pairs,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
