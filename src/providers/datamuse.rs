use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::ProviderError;

use super::{SynonymCandidate, SynonymSource};

/// Default public endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.datamuse.com";

/// Client for the Datamuse word-finding API
#[derive(Debug, Clone)]
pub struct Datamuse {
    /// Base URL of the API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Per-request timeout in milliseconds
    timeout_ms: u64,
    /// Maximum results requested per lookup
    max_results: usize,
}

/// One word from a Datamuse response
#[derive(Debug, Deserialize)]
struct DatamuseWord {
    word: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl Datamuse {
    /// Create a client for `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::new_with_config(base_url, 10, 2, 500, 100)
    }

    /// Create a client with explicit timeout and retry settings
    pub fn new_with_config(
        base_url: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        max_results: usize,
    ) -> Self {
        let timeout_ms = timeout_secs.saturating_mul(1000);
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            timeout_ms,
            max_results,
        }
    }

    fn convert(words: Vec<DatamuseWord>) -> Vec<SynonymCandidate> {
        words
            .into_iter()
            .map(|w| SynonymCandidate {
                is_proper_noun: w.tags.iter().any(|t| t == "prop"),
                word: w.word,
                tags: w.tags,
            })
            .collect()
    }
}

#[async_trait]
impl SynonymSource for Datamuse {
    async fn lookup(&self, word: &str) -> Result<Vec<SynonymCandidate>, ProviderError> {
        let url = format!("{}/words", self.base_url);
        let max = self.max_results.to_string();

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let response_result = self
                .client
                .get(&url)
                .query(&[("ml", word), ("md", "p"), ("max", max.as_str())])
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let words: Vec<DatamuseWord> = response
                            .json()
                            .await
                            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
                        debug!("Datamuse returned {} candidates for '{}'", words.len(), word);
                        return Ok(Self::convert(words));
                    } else if status.is_server_error() {
                        // Server error - can retry
                        let message = response.text().await.unwrap_or_default();
                        error!(
                            "Datamuse API error ({}): {} - attempt {}/{}",
                            status,
                            message,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    } else {
                        // Client error - don't retry
                        let message = response.text().await.unwrap_or_default();
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(ProviderError::Timeout(self.timeout_ms));
                }
                Err(e) if e.is_connect() => {
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
                Err(e) => {
                    last_error = Some(ProviderError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;

            // If we have more retries left, wait with exponential backoff
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Datamuse request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    fn name(&self) -> &str {
        "datamuse"
    }
}
