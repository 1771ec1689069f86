//! Validation and import of bulk-authored test payloads.
//!
//! A payload is a JSON document holding either one test object or an
//! array of them. Validation runs the question model's structural rules
//! over every question and never touches the store; persistence is a
//! separate, explicit step gated on validity by the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use quiz_core::{Question, QuestionDraft};

use crate::store::TestStore;

//
// ─── PAYLOAD DRAFTS ────────────────────────────────────────────────────────────
//

/// Raw candidate test definition from an import payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<QuestionDraft>>,
}

//
// ─── VALIDATION ────────────────────────────────────────────────────────────────
//

/// Lightweight per-test summary shown before import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestPreview {
    pub name: String,
    pub description: String,
    pub question_count: usize,
    /// Question counts grouped by kind tag.
    pub question_breakdown: BTreeMap<String, usize>,
}

/// Outcome of validating a payload: overall validity, every violation
/// across all tests, and the previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub tests: Vec<TestPreview>,
}

impl ValidationReport {
    fn failure(message: String) -> Self {
        Self {
            valid: false,
            errors: vec![message],
            tests: Vec::new(),
        }
    }
}

/// Validates a raw JSON payload without persisting anything.
///
/// A document that does not parse at all yields a single
/// `Invalid JSON: …` entry. Otherwise every violation across every
/// test and question is collected, each addressed to its 1-based test
/// and question position, and a preview is still produced for each
/// test that at least carries a name and a questions list, so a valid
/// sibling stays visible even when another test in the batch fails.
#[must_use]
pub fn validate_payload(json: &str) -> ValidationReport {
    let drafts = match parse_tests(json) {
        Ok(drafts) => drafts,
        Err(message) => return ValidationReport::failure(message),
    };

    if drafts.is_empty() {
        return ValidationReport::failure("No tests found in JSON".into());
    }

    let mut errors = Vec::new();
    let mut tests = Vec::new();

    for (index, test) in drafts.iter().enumerate() {
        let test_number = index + 1;

        if test.name.as_deref().unwrap_or("").is_empty() {
            errors.push(format!("Test {test_number}: Missing \"name\" field"));
        }
        match &test.questions {
            None => errors.push(format!(
                "Test {test_number}: Missing or invalid \"questions\" field (must be an array)"
            )),
            Some(questions) if questions.is_empty() => {
                errors.push(format!("Test {test_number}: Questions array cannot be empty"));
            }
            Some(questions) => {
                for (q_index, question) in questions.iter().enumerate() {
                    for violation in question.violations(q_index + 1) {
                        errors.push(format!("Test {test_number}: {violation}"));
                    }
                }
            }
        }

        if let (Some(name), Some(questions)) = (&test.name, &test.questions) {
            if !name.is_empty() {
                tests.push(preview(name, test.description.as_deref(), questions));
            }
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        tests,
    }
}

fn preview(name: &str, description: Option<&str>, questions: &[QuestionDraft]) -> TestPreview {
    let mut breakdown = BTreeMap::new();
    for question in questions {
        if let Some(tag) = question.kind.as_deref() {
            if !tag.is_empty() {
                *breakdown.entry(tag.to_owned()).or_insert(0) += 1;
            }
        }
    }
    TestPreview {
        name: name.to_owned(),
        description: description.unwrap_or("").to_owned(),
        question_count: questions.len(),
        question_breakdown: breakdown,
    }
}

fn parse_tests(json: &str) -> Result<Vec<TestDraft>, String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("Invalid JSON: {e}"))?;

    let result = if value.is_array() {
        serde_json::from_value::<Vec<TestDraft>>(value)
    } else {
        serde_json::from_value::<TestDraft>(value).map(|test| vec![test])
    };
    result.map_err(|e| format!("Invalid JSON: {e}"))
}

//
// ─── IMPORT ────────────────────────────────────────────────────────────────────
//

/// Outcome of delegating a validated payload to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub imported_count: usize,
    pub imported: Vec<String>,
    pub errors: Vec<String>,
}

/// Persists each test of the payload: one test insert followed by one
/// insert per question.
///
/// Failures are reported per test and do not roll back tests already
/// inserted; at-least-partial success is the policy, not atomicity.
pub fn import_payload(json: &str, store: &mut dyn TestStore) -> ImportOutcome {
    let drafts = match parse_tests(json) {
        Ok(drafts) => drafts,
        Err(message) => {
            return ImportOutcome {
                success: false,
                imported_count: 0,
                imported: Vec::new(),
                errors: vec![message],
            };
        }
    };

    let mut imported = Vec::new();
    let mut errors = Vec::new();

    for draft in drafts {
        let name = draft.name.clone().unwrap_or_default();
        match import_one(draft, store) {
            Ok(()) => imported.push(name),
            Err(reason) => errors.push(format!("Failed to import \"{name}\": {reason}")),
        }
    }

    ImportOutcome {
        success: errors.is_empty(),
        imported_count: imported.len(),
        imported,
        errors,
    }
}

fn import_one(draft: TestDraft, store: &mut dyn TestStore) -> Result<(), String> {
    let name = draft.name.as_deref().unwrap_or("");
    if name.is_empty() {
        return Err("missing \"name\" field".into());
    }
    let question_drafts = draft.questions.ok_or("missing \"questions\" field")?;

    // convert everything before the first insert so a structurally bad
    // question cannot leave a half-written test behind
    let mut questions = Vec::with_capacity(question_drafts.len());
    for (index, question) in question_drafts.into_iter().enumerate() {
        let question: Question = question
            .validate(index + 1)
            .map_err(|violations| violations.join("; "))?;
        questions.push(question);
    }

    let test_id = store
        .insert_test(name, draft.description.as_deref())
        .map_err(|e| e.to_string())?;
    for question in &questions {
        store
            .insert_question(&test_id, question)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
