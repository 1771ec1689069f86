//! Pure derivations of per-question status and display progress.

use serde::Serialize;

use crate::model::{Answer, Question, QuestionKind};
use crate::store::AnswerStore;

/// Whether a question has any recorded input.
///
/// A partially filled matching question still counts as answered; this
/// is a deliberate leniency for progress display, distinct from scoring
/// correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Answered,
    Unanswered,
}

impl QuestionStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::Unanswered => "unanswered",
        }
    }
}

/// Derives the status of one question from its recorded answer.
#[must_use]
pub fn question_status(question: &Question, answer: Option<&Answer>) -> QuestionStatus {
    let Some(answer) = answer else {
        return QuestionStatus::Unanswered;
    };

    let answered = match (question.kind(), answer) {
        (
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse | QuestionKind::MultiSelect,
            Answer::Selected(selected),
        ) => !selected.is_empty(),
        (QuestionKind::Matching, Answer::Matches(matches)) => !matches.is_empty(),
        (QuestionKind::FillInBlank, Answer::Text(text)) => !text.trim().is_empty(),
        // answer shape does not belong to this question kind
        _ => false,
    };

    if answered {
        QuestionStatus::Answered
    } else {
        QuestionStatus::Unanswered
    }
}

/// Display percentage for the navigation position.
///
/// This reflects position in the question list, not completion; the
/// answered-count ratio is a different number (see [`answered_count`]).
#[must_use]
pub fn position_percent(current_index: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = (current_index + 1) as f64 / total as f64;
    (ratio * 100.0).round() as u32
}

/// How many of the given questions currently have a recorded answer.
#[must_use]
pub fn answered_count(questions: &[Question], store: &AnswerStore) -> usize {
    questions
        .iter()
        .filter(|q| question_status(q, store.answer(q.id())) == QuestionStatus::Answered)
        .count()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
