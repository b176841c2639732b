//! vocabtest-core — Progress tracking, word selection and quiz sessions.
//!
//! This crate holds the mastery state machine, the weighted word selector,
//! the progress store and the session controller that ties them to the
//! external grading and dictionary collaborators.

pub mod category;
pub mod error;
pub mod selector;
pub mod session;
pub mod store;
pub mod traits;
pub mod transition;

pub use category::{Category, Partitions, VocabularySet, WordProgress};
pub use error::VocabError;
pub use store::{FileStore, MemoryStore, ProgressStore, Store};
