//! Validate-then-import flow against the in-memory store.

use services::import;
use services::store::{MemoryTestStore, TestStore};

const BATCH: &str = r#"[
    {
        "name": "Geography",
        "description": "Capitals of Europe",
        "questions": [
            {
                "id": "q1",
                "text": "Capital of France?",
                "type": "mcq",
                "options": ["Paris", "Berlin", "Madrid"],
                "correctAnswers": ["Paris"]
            },
            {
                "id": "q2",
                "text": "Match each country to its capital.",
                "type": "matching",
                "correctAnswers": [],
                "matchingPairs": [
                    {"prompt": "UK", "answer": "London"},
                    {"prompt": "Germany", "answer": "Berlin"}
                ]
            }
        ]
    },
    {
        "name": "Astronomy",
        "questions": [
            {
                "id": "q1",
                "text": "Name the largest planet.",
                "type": "fib",
                "correctAnswers": ["Jupiter", "jupiter"]
            }
        ]
    }
]"#;

#[test]
fn valid_batch_validates_and_imports() {
    let report = import::validate_payload(BATCH);
    assert!(report.valid, "errors: {:?}", report.errors);
    assert_eq!(report.tests.len(), 2);
    assert_eq!(report.tests[0].question_breakdown.get("matching"), Some(&1));

    let mut store = MemoryTestStore::new();
    let outcome = import::import_payload(BATCH, &mut store);
    assert!(outcome.success);
    assert_eq!(outcome.imported_count, 2);
    assert_eq!(store.tests().len(), 2);
    assert_eq!(store.find_by_name("Geography").unwrap().questions.len(), 2);
    assert_eq!(store.find_by_name("Astronomy").unwrap().questions.len(), 1);
}

#[test]
fn invalid_matching_question_blocks_validity_but_not_sibling_preview() {
    let payload = r#"[
        {
            "name": "Broken",
            "questions": [
                {
                    "id": "q1",
                    "text": "Match",
                    "type": "matching",
                    "correctAnswers": [],
                    "matchingPairs": [{"prompt": "UK", "answer": "London"}]
                }
            ]
        },
        {
            "name": "Fine",
            "questions": [
                {
                    "id": "q1",
                    "text": "Capital of France?",
                    "type": "mcq",
                    "options": ["Paris", "Berlin"],
                    "correctAnswers": ["Paris"]
                }
            ]
        }
    ]"#;

    let report = import::validate_payload(payload);
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("at least 2 matching pairs"));
    assert!(report.tests.iter().any(|t| t.name == "Fine"));
}

#[test]
fn partial_failure_keeps_earlier_tests() {
    // the second test's insert fails; the first stays persisted
    let mut store = MemoryTestStore::failing_on("Astronomy");
    let outcome = import::import_payload(BATCH, &mut store);

    assert!(!outcome.success);
    assert_eq!(outcome.imported_count, 1);
    assert_eq!(outcome.imported, vec!["Geography".to_string()]);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].starts_with("Failed to import \"Astronomy\""));
    assert!(store.find_by_name("Geography").is_some());
    assert!(store.find_by_name("Astronomy").is_none());
}

#[test]
fn validation_never_touches_the_store() {
    let mut store = MemoryTestStore::new();
    let report = import::validate_payload(BATCH);
    assert!(report.valid);
    assert!(store.tests().is_empty());

    // sanity: the same store accepts inserts afterwards
    let id = store.insert_test("Manual", None).unwrap();
    assert_eq!(id.as_str(), "test-1");
}
