//! Datamuse "means like" definition matcher.
//!
//! `GET {base_url}/words?ml=<definition>&max=<n>` returns words whose
//! meaning is close to the given text, best first.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use vocabtest_core::traits::DefinitionMatcher;

use crate::error::{endpoint, http_client, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.datamuse.com";
pub const DEFAULT_MAX_RESULTS: u32 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Matches definitions through the Datamuse API.
pub struct DatamuseMatcher {
    base_url: String,
    max_results: u32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl DatamuseMatcher {
    pub fn new(base_url: &str, max_results: u32) -> Result<Self, ProviderError> {
        Self::with_timeout(base_url, max_results, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: &str,
        max_results: u32,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };
        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            max_results: max_results.max(1),
            timeout_secs,
            client: http_client(timeout_secs)?,
        })
    }
}

#[derive(Deserialize)]
struct DatamuseWord {
    word: String,
    #[serde(default)]
    #[allow(dead_code)]
    score: Option<u64>,
}

#[async_trait]
impl DefinitionMatcher for DatamuseMatcher {
    fn name(&self) -> &str {
        "datamuse"
    }

    #[instrument(skip(self, definition), fields(len = definition.len()))]
    async fn candidates(&self, definition: &str) -> anyhow::Result<Vec<String>> {
        let mut url = endpoint(&self.base_url, &["words"])?;
        url.query_pairs_mut()
            .append_pair("ml", definition)
            .append_pair("max", &self.max_results.to_string());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::from_request(e, "Datamuse", self.timeout_secs))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let words: Vec<DatamuseWord> = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))?;

        tracing::debug!(count = words.len(), "datamuse candidates");
        Ok(words.into_iter().map(|w| w.word).collect())
    }
}
