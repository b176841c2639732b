//! Mastery categories, per-word progress and the category partitions of a
//! vocabulary set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mastery level of a word. Ordered from least to most known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    New,
    Learning,
    Reviewing,
    Mastered,
}

impl Category {
    /// All categories in ascending order.
    pub const ALL: [Category; 4] = [
        Category::New,
        Category::Learning,
        Category::Reviewing,
        Category::Mastered,
    ];

    /// Position of this category in [`Category::ALL`], also its persisted code.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a category by its persisted code (0-3).
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// The next category up, or `None` at the ceiling.
    pub fn promoted(self) -> Option<Self> {
        match self {
            Category::New => Some(Category::Learning),
            Category::Learning => Some(Category::Reviewing),
            Category::Reviewing => Some(Category::Mastered),
            Category::Mastered => None,
        }
    }

    /// The next category down, or `None` at the floor.
    ///
    /// `Learning` is the floor for demotion: a word that has been seen never
    /// returns to `New`.
    pub fn demoted(self) -> Option<Self> {
        match self {
            Category::Reviewing => Some(Category::Learning),
            Category::Mastered => Some(Category::Reviewing),
            Category::New | Category::Learning => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::New => write!(f, "new"),
            Category::Learning => write!(f, "learning"),
            Category::Reviewing => write!(f, "reviewing"),
            Category::Mastered => write!(f, "mastered"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Category::New),
            "learning" => Ok(Category::Learning),
            "reviewing" => Ok(Category::Reviewing),
            "mastered" => Ok(Category::Mastered),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Progress of a single word.
///
/// Persisted as a two-element array `[category code, streak]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u8, u32)", into = "(u8, u32)")]
pub struct WordProgress {
    pub category: Category,
    /// Consecutive correct answers since the last level change.
    pub streak: u32,
}

impl WordProgress {
    pub const fn new(category: Category, streak: u32) -> Self {
        Self { category, streak }
    }
}

impl Default for WordProgress {
    fn default() -> Self {
        Self::new(Category::New, 0)
    }
}

impl TryFrom<(u8, u32)> for WordProgress {
    type Error = String;

    fn try_from((code, streak): (u8, u32)) -> Result<Self, Self::Error> {
        let category =
            Category::from_code(code).ok_or_else(|| format!("invalid category code {code}"))?;
        if category == Category::New && streak != 0 {
            return Err(format!("new word with non-zero streak {streak}"));
        }
        Ok(Self { category, streak })
    }
}

impl From<WordProgress> for (u8, u32) {
    fn from(progress: WordProgress) -> Self {
        (progress.category.index() as u8, progress.streak)
    }
}

/// Normalize a word to its key form: trimmed and lowercased.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// A named vocabulary set with per-word progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularySet {
    name: String,
    location: String,
    words: BTreeMap<String, WordProgress>,
}

impl VocabularySet {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        words: BTreeMap<String, WordProgress>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            words,
        }
    }

    /// Build a set with every word at `{New, 0}`. Words are normalized;
    /// blanks and duplicates are dropped.
    pub fn from_words<I, S>(name: impl Into<String>, location: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize_word(w.as_ref()))
            .filter(|w| !w.is_empty())
            .map(|w| (w, WordProgress::default()))
            .collect();
        Self::new(name, location, words)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage location of the backing progress record.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn words(&self) -> &BTreeMap<String, WordProgress> {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&normalize_word(word))
    }

    /// Progress of `word`; words without a record count as new.
    pub fn progress(&self, word: &str) -> WordProgress {
        self.words
            .get(&normalize_word(word))
            .copied()
            .unwrap_or_default()
    }

    /// Replace the stored progress of `word`.
    pub fn set_progress(&mut self, word: &str, progress: WordProgress) {
        self.words.insert(normalize_word(word), progress);
    }

    /// Reset every word to `{New, 0}`.
    pub fn reset(&mut self) {
        for progress in self.words.values_mut() {
            *progress = WordProgress::default();
        }
    }

    pub fn partitions(&self) -> Partitions {
        Partitions::from_progress(&self.words)
    }
}

/// Words of a set split by their current category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitions {
    parts: [Vec<String>; 4],
}

impl Partitions {
    /// Derive partitions by filtering words on their current category.
    pub fn from_progress(words: &BTreeMap<String, WordProgress>) -> Self {
        let mut parts: [Vec<String>; 4] = Default::default();
        for (word, progress) in words {
            parts[progress.category.index()].push(word.clone());
        }
        Self { parts }
    }

    /// Build partitions directly, in `new, learning, reviewing, mastered` order.
    pub fn from_parts(
        new: Vec<String>,
        learning: Vec<String>,
        reviewing: Vec<String>,
        mastered: Vec<String>,
    ) -> Self {
        Self {
            parts: [new, learning, reviewing, mastered],
        }
    }

    pub fn get(&self, category: Category) -> &[String] {
        &self.parts[category.index()]
    }

    pub fn count(&self, category: Category) -> usize {
        self.parts[category.index()].len()
    }

    pub fn total(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        Category::ALL
            .into_iter()
            .map(move |c| (c, self.parts[c.index()].as_slice()))
    }
}
