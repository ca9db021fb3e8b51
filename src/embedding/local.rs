//! Local sentence-transformer embeddings (ONNX via fastembed).
//!
//! Only available with the `local-embeddings` cargo feature. Without it the
//! backend still parses but refuses to start.

use crate::config::EmbeddingConfig;
use crate::error::{AlignError, Result};

#[cfg(feature = "local-embeddings")]
pub use enabled::LocalEmbedder;

#[cfg(not(feature = "local-embeddings"))]
pub use disabled::LocalEmbedder;

const DEFAULT_MODEL: &str = "all-minilm-l6-v2";

fn model_name(config: &EmbeddingConfig) -> String {
    config
        .model
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_MODEL)
        .to_lowercase()
}

#[cfg(feature = "local-embeddings")]
mod enabled {
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use parking_lot::Mutex;
    use tracing::info;

    use super::{AlignError, EmbeddingConfig, Result, model_name};
    use crate::embedding::Embedder;

    /// fastembed model behind a mutex; inference calls are serialized.
    pub struct LocalEmbedder {
        model: Mutex<TextEmbedding>,
        model_name: String,
        dims: usize,
    }

    impl LocalEmbedder {
        /// Load the configured model, downloading weights on first use.
        pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
            let name = model_name(config);
            let model = parse_model(&name)?;

            let text_embedding =
                TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(false))
                    .map_err(|err| {
                        AlignError::ModelUnavailable(format!("failed to load {name}: {err}"))
                    })?;

            let embedder = Self {
                model: Mutex::new(text_embedding),
                model_name: name,
                dims: 0,
            };
            let sample = embedder.run(&["termalign startup check".to_string()])?;
            let dims = sample.first().map_or(0, Vec::len);
            if dims == 0 {
                return Err(AlignError::ModelUnavailable(format!(
                    "{} produced an empty startup embedding",
                    embedder.model_name
                )));
            }
            if config.dims as usize != dims {
                info!(
                    configured = config.dims,
                    actual = dims,
                    model = %embedder.model_name,
                    "embedding.dims ignored; using model dimension"
                );
            }

            Ok(Self { dims, ..embedder })
        }

        pub fn model_name(&self) -> &str {
            &self.model_name
        }

        fn run(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut model = self.model.lock();
            model
                .embed(texts, None)
                .map_err(|err| AlignError::Embedding(format!("{}: {err}", self.model_name)))
        }
    }

    impl Embedder for LocalEmbedder {
        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            self.run(texts)
        }

        fn dims(&self) -> usize {
            self.dims
        }

        fn name(&self) -> &str {
            "local"
        }
    }

    fn parse_model(name: &str) -> Result<EmbeddingModel> {
        match name {
            "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            "bge-small-en" | "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "bge-base-en" | "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            "multilingual-e5-small" => Ok(EmbeddingModel::MultilingualE5Small),
            other => Err(AlignError::Config(format!(
                "unknown local embedding model: {other}"
            ))),
        }
    }

}

#[cfg(not(feature = "local-embeddings"))]
mod disabled {
    use super::{AlignError, EmbeddingConfig, Result, model_name};
    use crate::embedding::Embedder;

    /// Placeholder for builds without the `local-embeddings` feature.
    ///
    /// Construction always fails, so no instance ever exists.
    pub struct LocalEmbedder {
        dims: usize,
    }

    impl LocalEmbedder {
        pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
            Err(AlignError::ModelUnavailable(format!(
                "local model {} requested but termalign was built without the \
                 local-embeddings feature",
                model_name(config)
            )))
        }
    }

    impl Embedder for LocalEmbedder {
        fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(AlignError::ModelUnavailable(
                "built without the local-embeddings feature".to_string(),
            ))
        }

        fn dims(&self) -> usize {
            self.dims
        }

        fn name(&self) -> &str {
            "local"
        }
    }

}
