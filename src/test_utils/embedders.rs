//! Embedders with hand-picked vectors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::embedding::Embedder;
use crate::error::{AlignError, Result};

/// Maps known texts to fixed vectors.
///
/// Texts are matched after trimming and lowercasing. Anything unknown embeds
/// to a one-hot vector on the last axis, so it is orthogonal to every known
/// text that leaves that axis at zero.
#[derive(Debug)]
pub struct FixtureEmbedder {
    dims: usize,
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl FixtureEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            vectors: HashMap::new(),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Builder: register the vector for `text`.
    #[must_use]
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dims, "fixture vector for {text:?}");
        self.vectors.insert(key(text), vector);
        self
    }

    /// Vectors for the ground-lease scenario corpus.
    ///
    /// cos("ground lease", "site lease") is about 0.95; "employee handbook"
    /// is orthogonal to both.
    pub fn lease_fixture() -> Self {
        Self::new(4)
            .with("ground lease", vec![1.0, 0.0, 0.0, 0.0])
            .with("site lease", vec![0.9, 0.3, 0.0, 0.0])
            .with("employee handbook", vec![0.0, 0.0, 1.0, 0.0])
    }

    /// Number of `embed_batch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every following call fail with [`AlignError::Embedding`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        self.vectors.get(&key(text)).cloned().unwrap_or_else(|| {
            let mut fallback = vec![0.0; self.dims];
            if let Some(last) = fallback.last_mut() {
                *last = 1.0;
            }
            fallback
        })
    }
}

impl Embedder for FixtureEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AlignError::Embedding("fixture embedder set to fail".to_string()));
        }
        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

fn key(text: &str) -> String {
    text.trim().to_lowercase()
}
