//! Free Dictionary API lookup (dictionaryapi.dev).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use vocabtest_core::traits::DictionaryLookup;

use crate::error::{endpoint, http_client, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Looks up English definitions through the Free Dictionary API.
pub struct FreeDictionary {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl FreeDictionary {
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };
        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
            client: http_client(timeout_secs)?,
        })
    }
}

#[derive(Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Deserialize)]
struct Meaning {
    #[serde(default, rename = "partOfSpeech")]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<Sense>,
}

#[derive(Deserialize)]
struct Sense {
    definition: String,
}

#[async_trait]
impl DictionaryLookup for FreeDictionary {
    fn name(&self) -> &str {
        "free-dictionary"
    }

    #[instrument(skip(self))]
    async fn senses(&self, word: &str) -> anyhow::Result<Vec<String>> {
        let url = endpoint(&self.base_url, &["api", "v2", "entries", "en", word.trim()])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::from_request(e, "Free Dictionary", self.timeout_secs))?;

        let status = response.status().as_u16();
        // Unknown words come back as 404 with a "No Definitions Found" body.
        if status == 404 {
            return Ok(vec![]);
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let entries: Vec<Entry> = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))?;

        Ok(entries
            .into_iter()
            .flat_map(|entry| entry.meanings)
            .flat_map(|meaning| {
                let pos = meaning.part_of_speech;
                meaning.definitions.into_iter().map(move |sense| match &pos {
                    Some(pos) => format!("({pos}) {}", sense.definition),
                    None => sense.definition,
                })
            })
            .collect())
    }
}
