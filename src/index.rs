//! Similarity index
//!
//! The embedding matrix for a corpus. Row `i` is the embedding of term `i`;
//! the two are built together and never drift apart.

use rayon::prelude::*;
use tracing::debug;

use crate::embedding::Embedder;
use crate::error::{AlignError, Result};
use crate::terms::Corpus;

/// Embedding matrix aligned with a [`Corpus`].
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    rows: Vec<Vec<f32>>,
    norms: Vec<f32>,
    dims: usize,
    provider: String,
}

impl SimilarityIndex {
    /// Embed every term text in one batch and keep the matrix.
    ///
    /// An empty corpus yields an empty index without calling the provider;
    /// scoring against it fails with [`AlignError::EmptyIndex`].
    pub fn build(corpus: &Corpus, embedder: &dyn Embedder) -> Result<Self> {
        let dims = embedder.dims();
        let provider = embedder.name().to_string();

        if corpus.is_empty() {
            return Ok(Self {
                rows: Vec::new(),
                norms: Vec::new(),
                dims,
                provider,
            });
        }

        let rows = embedder.embed_batch(&corpus.texts())?;
        if rows.len() != corpus.len() {
            return Err(AlignError::Embedding(format!(
                "{provider} returned {} vectors for {} terms",
                rows.len(),
                corpus.len()
            )));
        }

        let mut norms = Vec::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            if row.len() != dims {
                return Err(AlignError::Embedding(format!(
                    "vector for term {position} has {} dimensions, expected {dims}",
                    row.len()
                )));
            }
            let norm = l2_norm(row);
            if norm == 0.0 || !norm.is_finite() {
                let text = corpus.get(position).map_or("", |term| term.text.as_str());
                return Err(AlignError::UndefinedSimilarity(format!(
                    "term {position} ({text:?}) embedded to a zero or non-finite vector"
                )));
            }
            norms.push(norm);
        }

        debug!(rows = rows.len(), dims, provider = %provider, "similarity index built");
        Ok(Self {
            rows,
            norms,
            dims,
            provider,
        })
    }

    /// Cosine similarity of `query` against every row, in corpus order.
    pub fn score(&self, query: &[f32]) -> Result<Vec<(usize, f32)>> {
        if self.rows.is_empty() {
            return Err(AlignError::EmptyIndex(
                "no terms are indexed".to_string(),
            ));
        }
        if query.len() != self.dims {
            return Err(AlignError::Embedding(format!(
                "query vector has {} dimensions, index was built with {} ({})",
                query.len(),
                self.dims,
                self.provider
            )));
        }

        let query_norm = l2_norm(query);
        if query_norm == 0.0 || !query_norm.is_finite() {
            return Err(AlignError::UndefinedSimilarity(
                "query embedded to a zero or non-finite vector".to_string(),
            ));
        }

        Ok(self
            .rows
            .par_iter()
            .zip(self.norms.par_iter())
            .enumerate()
            .map(|(position, (row, norm))| {
                let cosine = dot(query, row) / (query_norm * norm);
                (position, cosine.clamp(-1.0, 1.0))
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub const fn dims(&self) -> usize {
        self.dims
    }

    /// Name of the embedding backend the matrix came from
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn row(&self, position: usize) -> Option<&[f32]> {
        self.rows.get(position).map(Vec::as_slice)
    }
}

/// Cosine similarity between two vectors.
///
/// Errors when the lengths differ or either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AlignError::Embedding(format!(
            "cannot compare vectors of {} and {} dimensions",
            a.len(),
            b.len()
        )));
    }
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(AlignError::UndefinedSimilarity(
            "cosine similarity of a zero vector".to_string(),
        ));
    }
    Ok((dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}
