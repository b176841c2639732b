//! Error taxonomy for the progress store, selector and quiz sessions.
//!
//! None of these are fatal to the host process. Store errors are reported
//! at the command boundary, `CorruptProgress` and `NoWordsAvailable` abort
//! a single session, and `ServiceUnavailable` is downgraded to an ungraded
//! round by the session controller.

use std::path::PathBuf;

use thiserror::Error;

/// Underlying I/O or parse failure kept as the source of a corruption error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by vocabtest core operations.
#[derive(Debug, Error)]
pub enum VocabError {
    /// A set with this name is already registered.
    #[error("a set named '{0}' already exists, please choose a different name")]
    DuplicateName(String),

    /// No set with this name is registered.
    #[error("'{0}' is not a vocab set")]
    UnknownSet(String),

    /// The set name cannot be used as a storage location.
    #[error("invalid set name '{0}'")]
    InvalidName(String),

    /// The word list could not be read or contained no words.
    #[error("word list unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The progress record of a registered set is missing or unparsable.
    #[error("progress for '{name}' is unusable ({reason}), please re-add the set")]
    CorruptProgress {
        name: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The set registry exists but cannot be parsed.
    #[error("set registry at '{location}' is corrupt: {reason}")]
    CorruptRegistry {
        location: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Persisting a record failed; the previous record is left in place.
    #[error("failed to write '{location}'")]
    WriteFailure {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Every category partition is empty (or carries zero weight).
    #[error("no words available to quiz")]
    NoWordsAvailable,

    /// The matching or dictionary service failed or timed out.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl VocabError {
    /// Returns `true` if this error only affects the current round of a
    /// session and the session may continue.
    pub fn is_round_local(&self) -> bool {
        matches!(self, VocabError::ServiceUnavailable(_))
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, VocabError>;
