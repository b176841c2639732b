//! vocabtest-providers — Definition matching and dictionary services.
//!
//! Implements the `DefinitionMatcher` and `DictionaryLookup` traits over the
//! Datamuse and Free Dictionary HTTP APIs, a local JSON dictionary for
//! offline use, and static stubs for tests.

pub mod config;
pub mod datamuse;
pub mod error;
pub mod free_dictionary;
pub mod local;
pub mod mock;

pub use config::{
    create_dictionary, create_matcher, load_config, DictionaryConfig, MatcherConfig,
    VocabtestConfig,
};
pub use error::ProviderError;
