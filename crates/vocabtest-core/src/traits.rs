//! Capability traits for the external grading and dictionary services.
//!
//! Implemented by the `vocabtest-providers` crate; tests use local stubs.

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Definition matching
// ---------------------------------------------------------------------------

/// Finds words that a free-text definition could describe.
#[async_trait]
pub trait DefinitionMatcher: Send + Sync {
    /// Human-readable service name (e.g. "datamuse").
    fn name(&self) -> &str;

    /// Candidate words for `definition`, best match first.
    async fn candidates(&self, definition: &str) -> anyhow::Result<Vec<String>>;
}

/// Whether `word` is among `candidates`, ignoring case and surrounding
/// whitespace.
pub fn is_candidate(word: &str, candidates: &[String]) -> bool {
    let word = word.trim().to_lowercase();
    candidates.iter().any(|c| c.trim().to_lowercase() == word)
}

// ---------------------------------------------------------------------------
// Dictionary lookup
// ---------------------------------------------------------------------------

/// Looks up human-readable definitions of a word.
#[async_trait]
pub trait DictionaryLookup: Send + Sync {
    /// Human-readable service name (e.g. "free-dictionary").
    fn name(&self) -> &str;

    /// Sense definitions of `word`, most common first. Empty if the word is
    /// unknown.
    async fn senses(&self, word: &str) -> anyhow::Result<Vec<String>>;
}

/// Shown when no definition can be obtained.
pub const DEFINITION_UNAVAILABLE: &str = "definition unavailable";
