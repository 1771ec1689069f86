use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

use quiz_core::{
    Answer, AnswerStore, Clock, OptionFeedback, PairFeedback, Question, QuestionId, QuestionKind,
    QuestionStatus, Score, TestId, scoring, status,
};

use crate::error::SessionError;

//
// ─── TEST INFO ─────────────────────────────────────────────────────────────────
//

/// Display metadata of the test being taken, as fetched from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInfo {
    pub id: TestId,
    pub name: String,
    pub description: Option<String>,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Attempt lifecycle: `InProgress` until the one-way transition to
/// `Submitted`, which freezes the score snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Submitted {
        score: Score,
        submitted_at: DateTime<Utc>,
    },
}

/// Aggregated view of attempt progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_submitted: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One test attempt: the ordered question list, the answer store, the
/// navigation cursor, and the in-progress/submitted state.
///
/// Exclusively owned by the active test-taking view; never persisted or
/// shared. Status and score are recomputed on every query rather than
/// tracked incrementally.
pub struct TestSession {
    info: TestInfo,
    questions: Vec<Question>,
    store: AnswerStore,
    current: usize,
    clock: Clock,
    started_at: DateTime<Utc>,
    state: SessionState,
}

impl TestSession {
    /// Starts a fresh attempt over the given question list.
    ///
    /// The clock stamps `started_at` now and `submitted_at` later; pass
    /// `Clock::fixed` in tests for deterministic timestamps.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        info: TestInfo,
        questions: Vec<Question>,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            info,
            questions,
            store: AnswerStore::new(),
            current: 0,
            clock,
            started_at: clock.now(),
            state: SessionState::InProgress,
        })
    }

    #[must_use]
    pub fn info(&self) -> &TestInfo {
        &self.info
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self.state, SessionState::Submitted { .. })
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SessionState::Submitted { submitted_at, .. } => Some(submitted_at),
            SessionState::InProgress => None,
        }
    }

    // ── navigation ──────────────────────────────────────────────────────

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Jumps to a question, clamping to the valid range. Allowed in both
    /// states so a submitted attempt can still be reviewed.
    pub fn navigate(&mut self, index: usize) {
        self.current = index.min(self.questions.len() - 1);
    }

    pub fn next(&mut self) {
        self.navigate(self.current + 1);
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    // ── answering ───────────────────────────────────────────────────────

    /// Records an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` after submission; the store is
    /// left untouched.
    pub fn answer(&mut self, entries: &[String]) -> Result<(), SessionError> {
        let id = self.current_question().id().clone();
        self.answer_question(&id, entries)
    }

    /// Records an answer for the identified question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` after submission and
    /// `SessionError::UnknownQuestion` for an id outside this test.
    pub fn answer_question(
        &mut self,
        id: &QuestionId,
        entries: &[String],
    ) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::Submitted);
        }
        let question = self
            .questions
            .iter()
            .find(|q| q.id() == id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownQuestion(id.clone()))?;
        self.store.set(&question, entries);
        Ok(())
    }

    /// Pairs `answer` with `prompt` on the current matching question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` after submission.
    pub fn assign_match(&mut self, prompt: &str, answer: &str) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::Submitted);
        }
        let question = self.current_question().clone();
        self.store.assign_match(&question, prompt, answer);
        Ok(())
    }

    /// Clears the pairing for `prompt` on the current matching question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` after submission.
    pub fn clear_match(&mut self, prompt: &str) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::Submitted);
        }
        let question = self.current_question().clone();
        self.store.clear_match(&question, prompt);
        Ok(())
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    /// Submits the attempt, freezing the answers and the score snapshot.
    ///
    /// One-way and idempotent: a second call returns the same frozen
    /// score without re-scoring.
    pub fn submit(&mut self) -> Score {
        if let SessionState::Submitted { score, .. } = self.state {
            return score;
        }
        let score = scoring::score(&self.questions, &self.store);
        self.state = SessionState::Submitted {
            score,
            submitted_at: self.clock.now(),
        };
        score
    }

    /// Discards the whole attempt and starts over: answers cleared,
    /// cursor reset, state back to in-progress. There is no
    /// resume-from-draft; leaving a test always costs the attempt.
    pub fn exit(&mut self) {
        self.store.clear();
        self.current = 0;
        self.started_at = self.clock.now();
        self.state = SessionState::InProgress;
    }

    // ── derived views ───────────────────────────────────────────────────

    /// Live score while in progress, frozen snapshot once submitted.
    #[must_use]
    pub fn score(&self) -> Score {
        match self.state {
            SessionState::Submitted { score, .. } => score,
            SessionState::InProgress => scoring::score(&self.questions, &self.store),
        }
    }

    /// Display entry array for a question; empty when unrecorded.
    #[must_use]
    pub fn entries(&self, id: &QuestionId) -> Vec<String> {
        self.store.entries(id)
    }

    #[must_use]
    pub fn current_status(&self) -> QuestionStatus {
        let question = self.current_question();
        status::question_status(question, self.store.answer(question.id()))
    }

    /// Position percentage for the progress bar: reflects where the
    /// cursor sits in the list, not how many questions are answered.
    #[must_use]
    pub fn position_percent(&self) -> u32 {
        status::position_percent(self.current, self.questions.len())
    }

    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        let total = self.questions.len();
        let answered = status::answered_count(&self.questions, &self.store);
        AttemptProgress {
            total,
            answered,
            remaining: total - answered,
            is_submitted: self.is_submitted(),
        }
    }

    // ── post-submission feedback ────────────────────────────────────────

    /// Per-option feedback for review display; `None` until submitted.
    #[must_use]
    pub fn option_feedback(&self, id: &QuestionId) -> Option<Vec<Option<OptionFeedback>>> {
        if !self.is_submitted() {
            return None;
        }
        let question = self.question(id)?;
        Some(scoring::option_feedback(question, self.store.answer(id)))
    }

    /// Per-pair feedback for review display; `None` until submitted.
    #[must_use]
    pub fn pair_feedback(&self, id: &QuestionId) -> Option<Vec<PairFeedback>> {
        if !self.is_submitted() {
            return None;
        }
        let question = self.question(id)?;
        Some(scoring::pair_feedback(question, self.store.answer(id)))
    }

    /// Fill-in-blank verdict for review display; `None` until submitted
    /// or while the field is blank.
    #[must_use]
    pub fn fill_in_feedback(&self, id: &QuestionId) -> Option<bool> {
        if !self.is_submitted() {
            return None;
        }
        let question = self.question(id)?;
        scoring::fill_in_feedback(question, self.store.answer(id))
    }

    /// Shuffled column of not-yet-used answers for the current matching
    /// question; empty for other kinds.
    #[must_use]
    pub fn answer_bank<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let question = self.current_question();
        if question.kind() != QuestionKind::Matching {
            return Vec::new();
        }

        let mut bank: Vec<String> = question
            .matching_pairs()
            .iter()
            .map(|pair| pair.answer.clone())
            .collect();
        if let Some(Answer::Matches(matches)) = self.store.answer(question.id()) {
            bank.retain(|answer| !matches.uses_answer(answer));
        }
        bank.shuffle(rng);
        bank
    }
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("test_id", &self.info.id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.store.len())
            .field("started_at", &self.started_at)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
