//! Embedding providers
//!
//! Everything that turns text into vectors sits behind [`Embedder`]. The
//! matcher only relies on two things: row `i` of a batch is the embedding of
//! input `i`, and corpus and query go through the same instance.
//!
//! ## Backends
//!
//! | backend | type              | notes                                        |
//! |---------|-------------------|----------------------------------------------|
//! | `hash`  | [`HashEmbedder`]  | default, deterministic, no model             |
//! | `api`   | [`ApiEmbedder`]   | OpenAI-compatible `/embeddings` endpoint     |
//! | `local` | [`LocalEmbedder`] | ONNX sentence-transformer, `local-embeddings` feature |

mod api;
mod hash;
mod local;
mod timeout;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::error::{AlignError, Result};

pub use api::ApiEmbedder;
pub use hash::HashEmbedder;
pub use local::LocalEmbedder;
pub use timeout::TimeoutEmbedder;

/// Pluggable embedding backend interface.
///
/// Implementations must tolerate concurrent calls, either because they hold
/// no mutable state or because they serialize access internally.
pub trait Embedder: Send + Sync {
    /// Embed a batch; output row `i` is the embedding of `texts[i]`.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut rows = self.embed_batch(&[text.to_string()])?;
        if rows.len() != 1 {
            return Err(AlignError::Embedding(format!(
                "{} returned {} rows for a single input",
                self.name(),
                rows.len()
            )));
        }
        Ok(rows.remove(0))
    }

    /// Vector dimension produced by this backend
    fn dims(&self) -> usize;

    /// Short backend identifier, recorded alongside the index
    fn name(&self) -> &str;
}

/// Build an embedder from config.
///
/// Any backend that cannot come up fails here with
/// [`AlignError::ModelUnavailable`]; nothing is retried.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let backend = config.backend.trim().to_lowercase();
    let dims = config.dims as usize;
    if dims == 0 {
        return Err(AlignError::Config(
            "embedding.dims must be greater than 0".to_string(),
        ));
    }

    let embedder: Arc<dyn Embedder> = match backend.as_str() {
        "" | "hash" => Arc::new(HashEmbedder::new(dims)),
        "api" => Arc::new(ApiEmbedder::connect(config)?),
        "local" => {
            let local: Arc<dyn Embedder> = Arc::new(LocalEmbedder::from_config(config)?);
            if config.timeout_ms > 0 {
                Arc::new(TimeoutEmbedder::new(
                    local,
                    Duration::from_millis(config.timeout_ms),
                ))
            } else {
                local
            }
        }
        other => {
            return Err(AlignError::Config(format!(
                "unknown embedding backend: {other} (expected hash|api|local)"
            )));
        }
    };

    debug!(
        backend = embedder.name(),
        dims = embedder.dims(),
        "embedding backend ready"
    );
    Ok(embedder)
}
