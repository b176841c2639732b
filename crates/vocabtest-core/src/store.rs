//! Persistence of the set registry and per-set progress records.
//!
//! [`Store`] is a small document store addressed by location strings.
//! [`FileStore`] maps locations to files under a data directory and writes
//! through a temp file that is renamed into place, so a failed write never
//! replaces the previous document. [`ProgressStore`] layers the registry and
//! the vocabulary-set operations on top of any backend.
//!
//! On-disk layout:
//! ```text
//! <data_dir>/
//! ├── vocab_sets.json   # {"gre": "gre.json", ...}
//! └── gre.json          # {"abate": [1, 0], "zealous": [0, 0], ...}
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::category::{Category, VocabularySet, WordProgress};
use crate::error::{BoxError, Result, VocabError};

/// Location of the registry document.
pub const REGISTRY_LOCATION: &str = "vocab_sets.json";

/// Name reserved by the CLI for "every set".
const RESERVED_NAME: &str = "all";

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

/// Backing storage for registry and progress documents.
pub trait Store: Send + Sync {
    /// Read a document. `Ok(None)` if nothing is stored at `location`.
    fn read(&self, location: &str) -> io::Result<Option<String>>;

    /// Replace a document. Either the whole new document becomes visible
    /// or the previous one stays in place.
    fn write(&self, location: &str, contents: &str) -> io::Result<()>;

    /// Remove a document. Returns `false` if it did not exist.
    fn remove(&self, location: &str) -> io::Result<bool>;
}

/// Documents stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, location: &str) -> PathBuf {
        self.root.join(location)
    }
}

impl Store for FileStore {
    fn read(&self, location: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_of(location)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, location: &str, contents: &str) -> io::Result<()> {
        let path = self.path_of(location);
        let dir = path.parent().unwrap_or(self.root.as_path());
        std::fs::create_dir_all(dir)?;

        // The temp file must live on the same filesystem for the rename to be atomic.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, location: &str) -> io::Result<bool> {
        match std::fs::remove_file(self.path_of(location)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// In-memory documents, for tests and dry runs.
///
/// Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document.
    pub fn with_document(self, location: &str, contents: &str) -> Self {
        self.lock().insert(location.to_string(), contents.to_string());
        self
    }

    /// Make every subsequent write and remove fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Current contents of a document.
    pub fn document(&self, location: &str) -> Option<String> {
        self.lock().get(location).cloned()
    }

    pub fn locations(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> io::Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            Err(io::Error::new(io::ErrorKind::Other, "writes disabled"))
        } else {
            Ok(())
        }
    }
}

impl Store for MemoryStore {
    fn read(&self, location: &str) -> io::Result<Option<String>> {
        Ok(self.document(location))
    }

    fn write(&self, location: &str, contents: &str) -> io::Result<()> {
        self.check_writable()?;
        self.lock().insert(location.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, location: &str) -> io::Result<bool> {
        self.check_writable()?;
        Ok(self.lock().remove(location).is_some())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Known vocabulary sets, keyed by name, mapped to their progress location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetRegistry {
    sets: BTreeMap<String, String>,
}

impl SetRegistry {
    pub fn location(&self, name: &str) -> Option<&str> {
        self.sets.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Per-category word counts of one set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSummary {
    pub name: String,
    pub counts: [usize; 4],
}

impl ProgressSummary {
    pub fn of(set: &VocabularySet) -> Self {
        let mut counts = [0; 4];
        for progress in set.words().values() {
            counts[progress.category.index()] += 1;
        }
        Self {
            name: set.name().to_string(),
            counts,
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// Progress store
// ---------------------------------------------------------------------------

/// Registry plus progress records over a [`Store`] backend.
pub struct ProgressStore {
    backend: Box<dyn Store>,
    registry: SetRegistry,
}

impl ProgressStore {
    /// Open the store and load the registry. A missing registry is empty.
    pub fn open(backend: Box<dyn Store>) -> Result<Self> {
        let corrupt = |reason: &str, source: BoxError| VocabError::CorruptRegistry {
            location: REGISTRY_LOCATION.to_string(),
            reason: reason.to_string(),
            source: Some(source),
        };
        let registry = match backend.read(REGISTRY_LOCATION) {
            Ok(Some(content)) => serde_json::from_str(&content)
                .map_err(|e| corrupt("invalid JSON", Box::new(e)))?,
            Ok(None) => SetRegistry::default(),
            Err(e) => return Err(corrupt("unreadable", Box::new(e))),
        };
        tracing::debug!(sets = registry.len(), "loaded set registry");
        Ok(Self { backend, registry })
    }

    pub fn registry(&self) -> &SetRegistry {
        &self.registry
    }

    /// Create a set from a newline-delimited word list file.
    pub fn create_set(&mut self, name: &str, source: &Path) -> Result<VocabularySet> {
        self.check_new_name(name)?;
        let content =
            std::fs::read_to_string(source).map_err(|e| VocabError::SourceUnavailable {
                path: source.to_path_buf(),
                source: e,
            })?;
        let set = VocabularySet::from_words(name, location_for(name), content.lines());
        if set.is_empty() {
            return Err(VocabError::SourceUnavailable {
                path: source.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidData, "word list contains no words"),
            });
        }
        self.register(set)
    }

    /// Create a set from words already in memory.
    pub fn create_set_from_words<I, S>(&mut self, name: &str, words: I) -> Result<VocabularySet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.check_new_name(name)?;
        let set = VocabularySet::from_words(name, location_for(name), words);
        self.register(set)
    }

    fn check_new_name(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if self.registry.contains(name) {
            return Err(VocabError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn register(&mut self, set: VocabularySet) -> Result<VocabularySet> {
        // Progress first: a failed registry write must not leave a dangling entry.
        self.write_progress(&set)?;
        self.registry
            .sets
            .insert(set.name().to_string(), set.location().to_string());
        if let Err(e) = self.save_registry() {
            self.registry.sets.remove(set.name());
            return Err(e);
        }
        tracing::info!(name = set.name(), words = set.len(), "created vocab set");
        Ok(set)
    }

    /// Load a registered set's progress.
    pub fn load_set(&self, name: &str) -> Result<VocabularySet> {
        let location = self
            .registry
            .location(name)
            .ok_or_else(|| VocabError::UnknownSet(name.to_string()))?;

        let corrupt = |reason: &str, source: Option<BoxError>| VocabError::CorruptProgress {
            name: name.to_string(),
            reason: reason.to_string(),
            source,
        };
        let content = self
            .backend
            .read(location)
            .map_err(|e| corrupt("unreadable", Some(Box::new(e))))?
            .ok_or_else(|| corrupt("progress record missing", None))?;
        let words: BTreeMap<String, WordProgress> = serde_json::from_str(&content)
            .map_err(|e| corrupt("invalid progress record", Some(Box::new(e))))?;

        tracing::debug!(name, words = words.len(), "loaded vocab set");
        Ok(VocabularySet::new(name, location, words))
    }

    /// Persist a set's progress and the registry.
    pub fn save_set(&mut self, set: &VocabularySet) -> Result<()> {
        if !self.registry.contains(set.name()) {
            return Err(VocabError::UnknownSet(set.name().to_string()));
        }
        self.write_progress(set)?;
        self.save_registry()?;
        tracing::info!(name = set.name(), "saved progress");
        Ok(())
    }

    /// Persist the registry.
    pub fn save_registry(&self) -> Result<()> {
        let json = to_json(&self.registry);
        self.backend
            .write(REGISTRY_LOCATION, &json)
            .map_err(|e| VocabError::WriteFailure {
                location: REGISTRY_LOCATION.to_string(),
                source: e,
            })
    }

    fn write_progress(&self, set: &VocabularySet) -> Result<()> {
        let json = to_json(set.words());
        self.backend
            .write(set.location(), &json)
            .map_err(|e| VocabError::WriteFailure {
                location: set.location().to_string(),
                source: e,
            })
    }

    /// Remove a set and its progress record.
    pub fn delete_set(&mut self, name: &str) -> Result<()> {
        let location = self
            .registry
            .sets
            .remove(name)
            .ok_or_else(|| VocabError::UnknownSet(name.to_string()))?;
        if let Err(e) = self.save_registry() {
            self.registry.sets.insert(name.to_string(), location);
            return Err(e);
        }
        self.remove_record(&location);
        tracing::info!(name, "deleted vocab set");
        Ok(())
    }

    /// Remove every set. Returns how many were removed.
    pub fn delete_all_sets(&mut self) -> Result<usize> {
        let removed = std::mem::take(&mut self.registry.sets);
        if let Err(e) = self.save_registry() {
            self.registry.sets = removed;
            return Err(e);
        }
        for location in removed.values() {
            self.remove_record(location);
        }
        tracing::info!(count = removed.len(), "deleted all vocab sets");
        Ok(removed.len())
    }

    fn remove_record(&self, location: &str) {
        // The registry no longer points here, so a leftover file is harmless.
        if let Err(e) = self.backend.remove(location) {
            tracing::warn!(location, error = %e, "failed to remove progress record");
        }
    }

    /// Reset every word of a set to new.
    pub fn clear_progress(&mut self, name: &str) -> Result<()> {
        let mut set = self.load_set(name)?;
        set.reset();
        self.write_progress(&set)?;
        tracing::info!(name, "cleared progress");
        Ok(())
    }

    /// Reset every word of every set.
    ///
    /// A set that cannot be cleared does not stop the others; each set's
    /// outcome is reported individually, in registry order.
    pub fn clear_all_progress(&mut self) -> Vec<(String, Result<()>)> {
        let names: Vec<String> = self.registry.names().map(str::to_string).collect();
        names
            .into_iter()
            .map(|name| {
                let outcome = self.clear_progress(&name);
                if let Err(e) = &outcome {
                    tracing::warn!(name = %name, error = %e, "failed to clear progress");
                }
                (name, outcome)
            })
            .collect()
    }

    /// Category counts of one set.
    pub fn summarize(&self, name: &str) -> Result<ProgressSummary> {
        Ok(ProgressSummary::of(&self.load_set(name)?))
    }

    /// Category counts of every set; unusable sets are reported individually.
    pub fn summarize_all(&self) -> Vec<(String, Result<ProgressSummary>)> {
        self.registry
            .names()
            .map(|name| (name.to_string(), self.summarize(name)))
            .collect()
    }
}

/// Progress location for a set name.
pub fn location_for(name: &str) -> String {
    format!("{name}.json")
}

/// Reject names that cannot be used as a file name inside the data directory.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name != name.trim()
        || name.starts_with('.')
        || name.contains(|c: char| c == '/' || c == '\\')
        || name == RESERVED_NAME
        || location_for(name) == REGISTRY_LOCATION;
    if invalid {
        return Err(VocabError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> String {
    // Maps of strings to plain values cannot fail to serialize.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
