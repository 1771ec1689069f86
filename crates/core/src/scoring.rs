//! Scoring of a full answer set against stored answer keys.
//!
//! Everything here is a pure function over immutable snapshots; the
//! session recomputes these on every query rather than maintaining
//! incremental counters.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::model::{Answer, MatchSet, MatchingPair, Question, QuestionKind};
use crate::store::AnswerStore;

/// Correct/total tally for one attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

/// Scores every question against the recorded answers.
///
/// `total` is always the question count; a question with no recorded
/// answer contributes to `total` but never to `correct`. Order of the
/// question list does not affect the result.
#[must_use]
pub fn score(questions: &[Question], answers: &AnswerStore) -> Score {
    let correct = questions
        .iter()
        .filter(|question| is_correct(question, answers.answer(question.id())))
        .count();

    Score {
        correct,
        total: questions.len(),
    }
}

/// Whether one recorded answer fully satisfies the question's key.
#[must_use]
pub fn is_correct(question: &Question, answer: Option<&Answer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (question.kind(), answer) {
        (
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse | QuestionKind::MultiSelect,
            Answer::Selected(selected),
        ) => check_selected(selected, question.correct_answers()),
        (QuestionKind::Matching, Answer::Matches(matches)) => {
            check_matching(matches, question.matching_pairs())
        }
        (QuestionKind::FillInBlank, Answer::Text(text)) => {
            check_fill_in_blank(text, question.correct_answers())
        }
        _ => false,
    }
}

/// Exact set equality; no partial credit for a missing or extra option.
fn check_selected(selected: &BTreeSet<String>, correct: &[String]) -> bool {
    selected.len() == correct.len() && correct.iter().all(|answer| selected.contains(answer))
}

/// Every prompt resolved, every pairing exact; one mismatch fails the
/// whole question.
fn check_matching(matches: &MatchSet, correct_pairs: &[MatchingPair]) -> bool {
    if matches.len() != correct_pairs.len() {
        return false;
    }
    matches.iter().all(|resolved| {
        correct_pairs
            .iter()
            .find(|pair| pair.prompt == resolved.prompt)
            .is_some_and(|pair| pair.answer == resolved.answer)
    })
}

/// Case-insensitive match against any acceptable surface form, either
/// literally (after trim/lowercase) or after symbol-stripping
/// normalization. Blank input never matches.
fn check_fill_in_blank(text: &str, acceptable: &[String]) -> bool {
    let typed = text.trim().to_lowercase();
    if typed.is_empty() {
        return false;
    }

    acceptable.iter().any(|form| {
        let form = form.to_lowercase();
        typed == form || normalize_text(&typed) == normalize_text(&form)
    })
}

/// Strips everything that is not a word character or whitespace, then
/// collapses whitespace runs to single spaces and trims.
///
/// Intentionally coarse: punctuation-insensitive, but no transliteration
/// or stemming. "H₂O" does not become "H2O"; the acceptable-forms list
/// carries such variants explicitly.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

//
// ─── FEEDBACK PROJECTION ───────────────────────────────────────────────────────
//

/// Post-submission verdict for a single option or pairing.
///
/// `Missed` marks a correct option the test-taker did not select. This
/// is a display projection of the same correctness rule used by
/// [`score`], re-derived at option granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionFeedback {
    Correct,
    Incorrect,
    Missed,
}

/// Per-option feedback, parallel to `question.options()`.
///
/// `None` for an option that was neither selected nor correct.
#[must_use]
pub fn option_feedback(question: &Question, answer: Option<&Answer>) -> Vec<Option<OptionFeedback>> {
    let empty = BTreeSet::new();
    let selected = match answer {
        Some(Answer::Selected(selected)) => selected,
        _ => &empty,
    };

    question
        .options()
        .iter()
        .map(|option| {
            let is_selected = selected.contains(option);
            let is_correct = question.correct_answers().contains(option);
            match (is_selected, is_correct) {
                (true, true) => Some(OptionFeedback::Correct),
                (true, false) => Some(OptionFeedback::Incorrect),
                (false, true) => Some(OptionFeedback::Missed),
                (false, false) => None,
            }
        })
        .collect()
}

/// Verdict for one resolved pairing of a matching question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairFeedback {
    pub prompt: String,
    pub answer: String,
    pub correct: bool,
}

/// Feedback for every resolved pairing; unresolved prompts produce no
/// entry (they render as empty drop targets, not as wrong answers).
#[must_use]
pub fn pair_feedback(question: &Question, answer: Option<&Answer>) -> Vec<PairFeedback> {
    let Some(Answer::Matches(matches)) = answer else {
        return Vec::new();
    };

    matches
        .iter()
        .map(|resolved| {
            let correct = question
                .matching_pairs()
                .iter()
                .find(|pair| pair.prompt == resolved.prompt)
                .is_some_and(|pair| pair.answer == resolved.answer);
            PairFeedback {
                prompt: resolved.prompt.clone(),
                answer: resolved.answer.clone(),
                correct,
            }
        })
        .collect()
}

/// Verdict for a fill-in-blank input; `None` while the field is blank.
#[must_use]
pub fn fill_in_feedback(question: &Question, answer: Option<&Answer>) -> Option<bool> {
    match answer {
        Some(Answer::Text(text)) if !text.trim().is_empty() => {
            Some(check_fill_in_blank(text, question.correct_answers()))
        }
        _ => None,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn mcq(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            "Capital of France?",
            QuestionKind::MultipleChoice,
            vec!["Paris".into(), "Berlin".into()],
            vec!["Paris".into()],
            Vec::new(),
        )
        .unwrap()
    }

    fn multi(id: &str, correct: &[&str]) -> Question {
        Question::new(
            QuestionId::new(id),
            "Select all primes",
            QuestionKind::MultiSelect,
            vec!["2".into(), "3".into(), "4".into(), "5".into()],
            correct.iter().map(|s| (*s).to_owned()).collect(),
            Vec::new(),
        )
        .unwrap()
    }

    fn matching(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            "Match capitals",
            QuestionKind::Matching,
            Vec::new(),
            Vec::new(),
            vec![
                MatchingPair::new("UK", "London"),
                MatchingPair::new("Germany", "Berlin"),
            ],
        )
        .unwrap()
    }

    fn fib(id: &str, forms: &[&str]) -> Question {
        Question::new(
            QuestionId::new(id),
            "Largest planet?",
            QuestionKind::FillInBlank,
            Vec::new(),
            forms.iter().map(|s| (*s).to_owned()).collect(),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn single_choice_scenarios() {
        let q = mcq("q1");
        let mut store = AnswerStore::new();

        store.set(&q, &["Paris".to_string()]);
        assert!(is_correct(&q, store.answer(q.id())));

        store.set(&q, &["Berlin".to_string()]);
        assert!(!is_correct(&q, store.answer(q.id())));

        store.set(&q, &[]);
        assert!(!is_correct(&q, store.answer(q.id())));
    }

    #[test]
    fn right_answer_plus_extra_is_wrong() {
        let q = mcq("q1");
        let mut store = AnswerStore::new();
        store.set(&q, &["Paris".to_string(), "Berlin".to_string()]);
        assert!(!is_correct(&q, store.answer(q.id())));
    }

    #[test]
    fn multi_select_requires_exact_set_equality() {
        let q = multi("q1", &["2", "3", "5"]);
        let mut store = AnswerStore::new();

        store.set(&q, &["2".to_string(), "3".to_string()]);
        assert!(!is_correct(&q, store.answer(q.id())));

        store.set(&q, &["2".to_string(), "3".to_string(), "5".to_string()]);
        assert!(is_correct(&q, store.answer(q.id())));

        store.set(
            &q,
            &[
                "2".to_string(),
                "3".to_string(),
                "4".to_string(),
                "5".to_string(),
            ],
        );
        assert!(!is_correct(&q, store.answer(q.id())));
    }

    #[test]
    fn matching_scenarios() {
        let q = matching("q1");
        let mut store = AnswerStore::new();

        store.set(
            &q,
            &["UK:London".to_string(), "Germany:Berlin".to_string()],
        );
        assert!(is_correct(&q, store.answer(q.id())));

        store.set(&q, &["UK:Berlin".to_string()]);
        assert!(!is_correct(&q, store.answer(q.id())));

        store.set(&q, &["UK:London".to_string()]);
        assert!(!is_correct(&q, store.answer(q.id())), "incomplete attempt");
    }

    #[test]
    fn matching_is_order_independent() {
        let q = matching("q1");
        let mut store = AnswerStore::new();
        store.set(
            &q,
            &["Germany:Berlin".to_string(), "UK:London".to_string()],
        );
        assert!(is_correct(&q, store.answer(q.id())));
    }

    #[test]
    fn fill_in_blank_is_case_and_punctuation_insensitive() {
        let q = fib("q1", &["H2O"]);
        let mut store = AnswerStore::new();

        for input in ["h2o", "H2O", "H2O."] {
            store.set(&q, &[input.to_string()]);
            assert!(is_correct(&q, store.answer(q.id())), "input {input:?}");
        }

        store.set(&q, &["".to_string()]);
        assert!(!is_correct(&q, store.answer(q.id())));
    }

    #[test]
    fn fill_in_blank_trims_and_lowercases() {
        let q = fib("q1", &["Jupiter", "jupiter"]);
        let mut store = AnswerStore::new();

        store.set(&q, &[" JUPITER ".to_string()]);
        assert!(is_correct(&q, store.answer(q.id())));

        store.set(&q, &["jupiter!".to_string()]);
        assert!(is_correct(&q, store.answer(q.id())));

        store.set(&q, &["Saturn".to_string()]);
        assert!(!is_correct(&q, store.answer(q.id())));
    }

    #[test]
    fn normalize_strips_symbols_and_collapses_whitespace() {
        assert_eq!(normalize_text("  hello,   world! "), "hello world");
        assert_eq!(normalize_text("a_b-c"), "a_bc");
        assert_eq!(normalize_text("..."), "");
    }

    #[test]
    fn absent_answer_scores_incorrect_but_counts_in_total() {
        let questions = vec![mcq("q1"), fib("q2", &["Jupiter"])];
        let mut store = AnswerStore::new();
        store.set(&questions[0], &["Paris".to_string()]);

        let tally = score(&questions, &store);
        assert_eq!(tally, Score { correct: 1, total: 2 });
    }

    #[test]
    fn score_is_order_independent() {
        let mut questions = vec![mcq("q1"), fib("q2", &["Jupiter"]), matching("q3")];
        let mut store = AnswerStore::new();
        store.set(&questions[0], &["Paris".to_string()]);
        store.set(&questions[1], &["jupiter".to_string()]);

        let forward = score(&questions, &store);
        questions.reverse();
        let backward = score(&questions, &store);
        assert_eq!(forward, backward);
        assert_eq!(forward.correct, 2);
    }

    #[test]
    fn option_feedback_marks_missed_correct_options() {
        let q = multi("q1", &["2", "3"]);
        let mut store = AnswerStore::new();
        store.set(&q, &["2".to_string(), "4".to_string()]);

        let feedback = option_feedback(&q, store.answer(q.id()));
        assert_eq!(
            feedback,
            vec![
                Some(OptionFeedback::Correct),
                Some(OptionFeedback::Missed),
                Some(OptionFeedback::Incorrect),
                None,
            ]
        );
    }

    #[test]
    fn pair_feedback_covers_only_resolved_pairs() {
        let q = matching("q1");
        let mut store = AnswerStore::new();
        store.set(&q, &["UK:Berlin".to_string()]);

        let feedback = pair_feedback(&q, store.answer(q.id()));
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].prompt, "UK");
        assert!(!feedback[0].correct);
    }

    #[test]
    fn fill_in_feedback_is_none_while_blank() {
        let q = fib("q1", &["Jupiter"]);
        assert_eq!(fill_in_feedback(&q, None), None);

        let mut store = AnswerStore::new();
        store.set(&q, &["  ".to_string()]);
        assert_eq!(fill_in_feedback(&q, store.answer(q.id())), None);

        store.set(&q, &["jupiter".to_string()]);
        assert_eq!(fill_in_feedback(&q, store.answer(q.id())), Some(true));
    }
}
