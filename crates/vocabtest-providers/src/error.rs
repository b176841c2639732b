//! Provider error types.

use thiserror::Error;

/// Errors that can occur when calling an external word service.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The configured base URL cannot be used.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

impl ProviderError {
    /// Map a transport-level reqwest error.
    pub(crate) fn from_request(err: reqwest::Error, service: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else if err.is_connect() {
            ProviderError::NetworkError(format!("{service} not reachable: {err}"))
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

/// Build the shared HTTP client with a request timeout.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(concat!("vocabtest/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))
}

/// Parse a base URL and append path segments to it.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<reqwest::Url, ProviderError> {
    let mut url =
        reqwest::Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments() {
        let url = endpoint("http://localhost:8080/", &["api", "v2", "entries", "en", "ice cream"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v2/entries/en/ice%20cream");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = endpoint("https://example.com/proxy", &["words"]).unwrap();
        assert_eq!(url.path(), "/proxy/words");
    }

    #[test]
    fn endpoint_rejects_garbage() {
        assert!(matches!(endpoint("not a url", &["x"]), Err(ProviderError::InvalidUrl(_))));
        assert!(matches!(endpoint("mailto:me@example.com", &["x"]), Err(ProviderError::InvalidUrl(_))));
    }
}
