//! Offline dictionary backed by a local JSON file.
//!
//! The file maps words to one or more definitions:
//! ```json
//! {"abate": ["become less in amount or intensity"], "zealous": "marked by active interest"}
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use vocabtest_core::category::normalize_word;
use vocabtest_core::traits::DictionaryLookup;

#[derive(Deserialize)]
#[serde(untagged)]
enum Senses {
    One(String),
    Many(Vec<String>),
}

/// Definitions loaded once from a JSON file.
#[derive(Debug, Default)]
pub struct LocalDictionary {
    entries: HashMap<String, Vec<String>>,
}

impl LocalDictionary {
    /// Load a dictionary file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dictionary: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse dictionary: {}", path.display()))
    }

    /// Parse a dictionary from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, Senses> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(word, senses)| {
                let senses = match senses {
                    Senses::One(s) => vec![s],
                    Senses::Many(v) => v,
                };
                (normalize_word(&word), senses)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl DictionaryLookup for LocalDictionary {
    fn name(&self) -> &str {
        "file"
    }

    async fn senses(&self, word: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .entries
            .get(&normalize_word(word))
            .cloned()
            .unwrap_or_default())
    }
}
