//! Remote embeddings over an OpenAI-compatible HTTP API.
//!
//! Sends `POST {base_url}/embeddings` with `{"model", "input": [...]}` and
//! reads `data[*].embedding`, re-ordered by `data[*].index`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Embedder;
use crate::config::EmbeddingConfig;
use crate::error::{AlignError, Result};

const DEFAULT_MODEL: &str = "text-embedding-3-small";
const STARTUP_CHECK_TEXT: &str = "termalign startup check";

pub struct ApiEmbedder {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dims: usize,
    timeout: Duration,
}

impl std::fmt::Debug for ApiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEmbedder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("dims", &self.dims)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

impl ApiEmbedder {
    /// Create the client and check the endpoint once.
    ///
    /// A startup check that cannot reach the endpoint, times out, or returns vectors
    /// of the wrong dimension fails with [`AlignError::ModelUnavailable`].
    pub fn connect(config: &EmbeddingConfig) -> Result<Self> {
        let embedder = Self::new(config)?;
        embedder
            .embed_batch(&[STARTUP_CHECK_TEXT.to_string()])
            .map_err(|err| {
                AlignError::ModelUnavailable(format!(
                    "embedding endpoint {} failed startup check: {err}",
                    embedder.endpoint
                ))
            })?;
        debug!(endpoint = %embedder.endpoint, model = %embedder.model, "embedding endpoint reachable");
        Ok(embedder)
    }

    /// Create the client without contacting the endpoint.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AlignError::MissingConfig("embedding.base_url".to_string()))?;

        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty());

        let timeout = Duration::from_millis(config.timeout_ms.max(1));
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AlignError::ModelUnavailable(format!("embedding http client: {err}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            dims: config.dims as usize,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, err: &reqwest::Error) -> AlignError {
        if err.is_timeout() {
            AlignError::ProviderTimeout {
                elapsed: self.timeout,
            }
        } else if err.is_connect() {
            AlignError::ModelUnavailable(format!("cannot reach {}: {err}", self.endpoint))
        } else {
            AlignError::Embedding(format!("embedding request failed: {err}"))
        }
    }
}

impl Embedder for ApiEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|err| self.map_send_error(&err))?;
        if !response.status().is_success() {
            return Err(AlignError::Embedding(format!(
                "embedding endpoint returned HTTP {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response.json().map_err(|err| {
            if err.is_timeout() {
                AlignError::ProviderTimeout {
                    elapsed: self.timeout,
                }
            } else {
                AlignError::Embedding(format!("embedding response parse: {err}"))
            }
        })?;

        let mut items = body.data;
        if items.len() != texts.len() {
            return Err(AlignError::Embedding(format!(
                "embedding endpoint returned {} vectors for {} inputs",
                items.len(),
                texts.len()
            )));
        }
        if items.iter().all(|item| item.index.is_some()) {
            items.sort_by_key(|item| item.index);
        }

        items
            .into_iter()
            .map(|item| {
                if item.embedding.len() == self.dims {
                    Ok(item.embedding)
                } else {
                    Err(AlignError::Embedding(format!(
                        "expected {}-dimensional vectors, got {}",
                        self.dims,
                        item.embedding.len()
                    )))
                }
            })
            .collect()
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "api"
    }
}
