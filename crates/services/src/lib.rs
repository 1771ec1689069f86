#![forbid(unsafe_code)]

pub mod error;
pub mod import;
pub mod session;
pub mod store;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use import::{ImportOutcome, TestDraft, TestPreview, ValidationReport};
pub use session::{AttemptProgress, SessionState, TestInfo, TestSession};
pub use store::{MemoryTestStore, StoreError, StoredTest, TestStore};
