//! Static services for tests and offline demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use vocabtest_core::traits::{DefinitionMatcher, DictionaryLookup};

/// A definition matcher with canned answers.
///
/// Returns the candidates of the first key contained in the definition.
pub struct StaticMatcher {
    /// Map of definition substring → candidate words.
    responses: HashMap<String, Vec<String>>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last definition received.
    last_definition: Mutex<Option<String>>,
}

impl StaticMatcher {
    pub fn new(responses: HashMap<String, Vec<String>>) -> Self {
        Self {
            responses,
            call_count: AtomicU32::new(0),
            last_definition: Mutex::new(None),
        }
    }

    /// Build from `(definition substring, candidates)` pairs.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(key, words)| (key.to_string(), words.iter().map(|w| w.to_string()).collect()))
                .collect(),
        )
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_definition(&self) -> Option<String> {
        self.last_definition
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl DefinitionMatcher for StaticMatcher {
    fn name(&self) -> &str {
        "static"
    }

    async fn candidates(&self, definition: &str) -> anyhow::Result<Vec<String>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_definition
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(definition.to_string());

        Ok(self
            .responses
            .iter()
            .find(|(key, _)| definition.contains(key.as_str()))
            .map(|(_, words)| words.clone())
            .unwrap_or_default())
    }
}

/// A dictionary with a fixed set of entries.
#[derive(Debug, Default)]
pub struct StaticDictionary {
    entries: HashMap<String, Vec<String>>,
}

impl StaticDictionary {
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    pub fn with_entry(mut self, word: &str, sense: &str) -> Self {
        self.entries
            .entry(word.to_string())
            .or_default()
            .push(sense.to_string());
        self
    }
}

#[async_trait]
impl DictionaryLookup for StaticDictionary {
    fn name(&self) -> &str {
        "static"
    }

    async fn senses(&self, word: &str) -> anyhow::Result<Vec<String>> {
        Ok(self.entries.get(word).cloned().unwrap_or_default())
    }
}
