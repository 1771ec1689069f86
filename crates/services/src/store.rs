//! Persistence seam for validated tests.
//!
//! The real backing store is an external document database; the core
//! only needs the two insert operations the importer delegates to, so
//! that is the whole trait. Everything is synchronous; the engine does
//! no I/O of its own.

use thiserror::Error;

use quiz_core::{Question, TestId};

/// Errors surfaced by store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),
}

/// Insert operations the importer delegates to, one test record followed
/// by one record per question.
pub trait TestStore {
    /// Persists a test shell and returns its assigned identity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the backing store rejects the insert.
    fn insert_test(&mut self, name: &str, description: Option<&str>)
    -> Result<TestId, StoreError>;

    /// Persists one question under an already-inserted test.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the test does not exist.
    fn insert_question(&mut self, test_id: &TestId, question: &Question)
    -> Result<(), StoreError>;
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

/// A persisted test with its questions, as held by [`MemoryTestStore`].
#[derive(Debug, Clone)]
pub struct StoredTest {
    pub id: TestId,
    pub name: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

/// In-memory `TestStore` used in tests and anywhere a real adapter is
/// not wired up. Can inject a failure on a named test to exercise the
/// partial-import policy.
#[derive(Debug, Clone, Default)]
pub struct MemoryTestStore {
    tests: Vec<StoredTest>,
    next_id: u64,
    fail_on_name: Option<String>,
}

impl MemoryTestStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `insert_test` fail for a test with this exact name.
    #[must_use]
    pub fn failing_on(name: impl Into<String>) -> Self {
        Self {
            fail_on_name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tests(&self) -> &[StoredTest] {
        &self.tests
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&StoredTest> {
        self.tests.iter().find(|t| t.name == name)
    }
}

impl TestStore for MemoryTestStore {
    fn insert_test(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<TestId, StoreError> {
        if self.fail_on_name.as_deref() == Some(name) {
            return Err(StoreError::Connection("injected insert failure".into()));
        }

        self.next_id += 1;
        let id = TestId::new(format!("test-{}", self.next_id));
        self.tests.push(StoredTest {
            id: id.clone(),
            name: name.to_owned(),
            description: description.map(str::to_owned),
            questions: Vec::new(),
        });
        Ok(id)
    }

    fn insert_question(
        &mut self,
        test_id: &TestId,
        question: &Question,
    ) -> Result<(), StoreError> {
        let test = self
            .tests
            .iter_mut()
            .find(|t| &t.id == test_id)
            .ok_or(StoreError::NotFound)?;
        test.questions.push(question.clone());
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
