//! Configuration loading and service factories.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vocabtest_core::selector::CategoryWeights;
use vocabtest_core::session::{SessionConfig, DEFAULT_EXIT_TOKEN};
use vocabtest_core::traits::{DefinitionMatcher, DictionaryLookup};
use vocabtest_core::transition::DEFAULT_PROMOTION_THRESHOLD;

use crate::datamuse::{self, DatamuseMatcher};
use crate::free_dictionary::{self, FreeDictionary};
use crate::local::LocalDictionary;

/// Which service grades definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MatcherConfig {
    Datamuse {
        #[serde(default = "default_datamuse_url")]
        base_url: String,
        #[serde(default = "default_max_results")]
        max_results: u32,
    },
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig::Datamuse {
            base_url: default_datamuse_url(),
            max_results: default_max_results(),
        }
    }
}

/// Where definitions shown after each answer come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DictionaryConfig {
    FreeDictionary {
        #[serde(default = "default_dictionary_url")]
        base_url: String,
    },
    /// A local JSON file of `word -> definitions`.
    File { path: PathBuf },
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        DictionaryConfig::FreeDictionary {
            base_url: default_dictionary_url(),
        }
    }
}

fn default_datamuse_url() -> String {
    datamuse::DEFAULT_BASE_URL.to_string()
}
fn default_max_results() -> u32 {
    datamuse::DEFAULT_MAX_RESULTS
}
fn default_dictionary_url() -> String {
    free_dictionary::DEFAULT_BASE_URL.to_string()
}

/// Top-level vocabtest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabtestConfig {
    /// Directory holding the registry and progress records.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Consecutive correct answers needed for a promotion.
    #[serde(default = "default_threshold")]
    pub promotion_threshold: u32,
    /// Selection weights in `new, learning, reviewing, mastered` order.
    #[serde(default)]
    pub weights: CategoryWeights,
    /// Answer that ends a quiz.
    #[serde(default = "default_exit_token")]
    pub exit_token: String,
    /// Upper bound on each service call, in seconds.
    #[serde(default = "default_timeout")]
    pub service_timeout_secs: u64,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
}

fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".local").join("share").join("vocabtest"),
        Err(_) => PathBuf::from("./vocabtest-data"),
    }
}
fn default_threshold() -> u32 {
    DEFAULT_PROMOTION_THRESHOLD
}
fn default_exit_token() -> String {
    DEFAULT_EXIT_TOKEN.to_string()
}
fn default_timeout() -> u64 {
    10
}

impl Default for VocabtestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            promotion_threshold: default_threshold(),
            weights: CategoryWeights::default(),
            exit_token: default_exit_token(),
            service_timeout_secs: default_timeout(),
            matcher: MatcherConfig::default(),
            dictionary: DictionaryConfig::default(),
        }
    }
}

impl VocabtestConfig {
    /// Reject values the quiz cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.promotion_threshold == 0 {
            anyhow::bail!("promotion_threshold must be at least 1");
        }
        self.weights
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid weights: {e}"))?;
        if self.exit_token.trim().is_empty() {
            anyhow::bail!("exit_token must not be empty");
        }
        if self.service_timeout_secs == 0 {
            anyhow::bail!("service_timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Session tunables derived from this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            promotion_threshold: self.promotion_threshold,
            weights: self.weights,
            exit_token: self.exit_token.trim().to_string(),
            service_timeout: Duration::from_secs(self.service_timeout_secs),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    // Substituted values are copied verbatim, never rescanned.
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars and a leading `~/` in a path.
fn resolve_path(path: &Path) -> PathBuf {
    let resolved = resolve_env_vars(&path.to_string_lossy());
    match (resolved.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(resolved),
    }
}

fn resolve_config(config: &mut VocabtestConfig) {
    config.data_dir = resolve_path(&config.data_dir);
    match &mut config.matcher {
        MatcherConfig::Datamuse { base_url, .. } => *base_url = resolve_env_vars(base_url),
    }
    match &mut config.dictionary {
        DictionaryConfig::FreeDictionary { base_url } => *base_url = resolve_env_vars(base_url),
        DictionaryConfig::File { path } => *path = resolve_path(path),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `vocabtest.toml` in the current directory
/// 2. `~/.config/vocabtest/config.toml`
///
/// `VOCABTEST_DATA_DIR` overrides `data_dir`.
pub fn load_config() -> Result<VocabtestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<VocabtestConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("vocabtest.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<VocabtestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => VocabtestConfig::default(),
    };

    if let Ok(dir) = std::env::var("VOCABTEST_DATA_DIR") {
        if !dir.is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    resolve_config(&mut config);
    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vocabtest"))
}

/// Create the definition matcher described by `config`.
pub fn create_matcher(config: &MatcherConfig, timeout_secs: u64) -> Result<Box<dyn DefinitionMatcher>> {
    match config {
        MatcherConfig::Datamuse {
            base_url,
            max_results,
        } => Ok(Box::new(DatamuseMatcher::with_timeout(
            base_url,
            *max_results,
            timeout_secs,
        )?)),
    }
}

/// Create the dictionary described by `config`.
pub fn create_dictionary(
    config: &DictionaryConfig,
    timeout_secs: u64,
) -> Result<Box<dyn DictionaryLookup>> {
    match config {
        DictionaryConfig::FreeDictionary { base_url } => {
            Ok(Box::new(FreeDictionary::with_timeout(base_url, timeout_secs)?))
        }
        DictionaryConfig::File { path } => Ok(Box::new(LocalDictionary::load(path)?)),
    }
}
