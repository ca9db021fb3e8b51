//! Semantic matcher
//!
//! The session object. It owns the embedding backend and the currently
//! published corpus/index pair, and answers every query against that pair.
//!
//! ## Reloading
//!
//! A load builds a complete [`IndexedCorpus`] without holding any lock and
//! then publishes it with a single pointer swap. Searches clone the current
//! `Arc` and finish against it even if a reload publishes a newer pair in the
//! meantime. A failed load publishes nothing: after a failed first load
//! every search fails with [`AlignError::EmptyIndex`], after a failed reload
//! the previous pair stays in service.

mod types;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::{Config, MatcherConfig};
use crate::embedding::{Embedder, build_embedder};
use crate::error::{AlignError, Result};
use crate::index::SimilarityIndex;
use crate::terms::{Corpus, CorpusStats, Term, TermSource, load_sources};

pub use types::{CanonicalMapping, DomainFilter, MatchResult};

/// A corpus together with the index built from it.
#[derive(Debug)]
pub struct IndexedCorpus {
    corpus: Corpus,
    index: SimilarityIndex,
}

impl IndexedCorpus {
    /// Embed `corpus` with `embedder`; all or nothing.
    pub fn build(corpus: Corpus, embedder: &dyn Embedder) -> Result<Self> {
        let index = SimilarityIndex::build(&corpus, embedder)?;
        Ok(Self { corpus, index })
    }

    pub const fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub const fn index(&self) -> &SimilarityIndex {
        &self.index
    }
}

/// Load-once, query-many matching session.
pub struct SemanticMatcher {
    embedder: Arc<dyn Embedder>,
    config: MatcherConfig,
    current: RwLock<Option<Arc<IndexedCorpus>>>,
}

impl SemanticMatcher {
    pub fn new(embedder: Arc<dyn Embedder>, config: MatcherConfig) -> Self {
        Self {
            embedder,
            config,
            current: RwLock::new(None),
        }
    }

    /// Bring up the configured embedding backend. Nothing is loaded yet.
    pub fn from_config(config: &Config) -> Result<Self> {
        let embedder = build_embedder(&config.embedding)?;
        Ok(Self::new(embedder, config.matcher.clone()))
    }

    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Load `sources`, embed them and publish the result.
    pub fn load(&self, sources: &[TermSource]) -> Result<CorpusStats> {
        let loaded = load_sources(sources).inspect_err(|err| self.report_failed_load(err))?;
        for path in &loaded.skipped {
            debug!(path = %path.display(), "optional source not loaded");
        }
        self.load_corpus(loaded.corpus)
    }

    /// Embed an in-memory corpus and publish it.
    pub fn load_corpus(&self, corpus: Corpus) -> Result<CorpusStats> {
        let indexed = IndexedCorpus::build(corpus, self.embedder.as_ref())
            .inspect_err(|err| self.report_failed_load(err))?;
        let stats = indexed.corpus.stats();

        *self.current.write() = Some(Arc::new(indexed));

        info!(
            total = stats.total,
            domains = stats.per_domain.len(),
            backend = self.embedder.name(),
            "corpus loaded"
        );
        for (domain, count) in &stats.per_domain {
            info!(domain = %domain, terms = count, "domain loaded");
        }
        Ok(stats)
    }

    fn report_failed_load(&self, err: &AlignError) {
        if self.is_loaded() {
            warn!(error = %err, "reload failed; previous corpus stays in service");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// The currently published corpus/index pair.
    pub fn snapshot(&self) -> Option<Arc<IndexedCorpus>> {
        self.current.read().clone()
    }

    fn require_snapshot(&self) -> Result<Arc<IndexedCorpus>> {
        self.snapshot()
            .ok_or_else(|| AlignError::EmptyIndex("no corpus has been loaded".to_string()))
    }

    /// Rank corpus terms by similarity to `query`.
    ///
    /// Keeps terms scoring at least `min_similarity` that pass `filter`,
    /// highest first, equal scores in corpus order, at most `top_k`.
    pub fn search(
        &self,
        query: &str,
        filter: &DomainFilter,
        top_k: usize,
        min_similarity: f32,
    ) -> Result<Vec<MatchResult>> {
        validate_threshold(min_similarity)?;
        let snapshot = self.require_snapshot()?;
        if snapshot.index.is_empty() {
            return Err(AlignError::EmptyIndex("the loaded corpus has no terms".to_string()));
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed_one(query)?;
        let scores = snapshot.index.score(&query_vector)?;

        let mut ranked: Vec<(usize, f32)> = scores
            .into_iter()
            .filter(|(_, score)| *score >= min_similarity)
            .filter(|(position, _)| {
                snapshot
                    .corpus
                    .get(*position)
                    .is_some_and(|term| filter.matches(&term.domain))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_k);

        let results: Vec<MatchResult> = ranked
            .into_iter()
            .filter_map(|(position, similarity)| {
                snapshot.corpus.get(position).map(|term| MatchResult {
                    term: term.clone(),
                    similarity,
                    position,
                })
            })
            .collect();

        debug!(
            query,
            filter = %filter,
            top_k,
            min_similarity,
            results = results.len(),
            "search"
        );
        Ok(results)
    }

    /// Canonical label of the nearest term.
    ///
    /// Unmapped when the nearest term has no label or scores below
    /// `canonical_min_similarity`.
    pub fn resolve_canonical(&self, term: &str) -> Result<CanonicalMapping> {
        let top = self.search(term, &DomainFilter::All, 1, 0.0)?;
        let mapping = match top.first() {
            Some(best) if best.similarity >= self.config.canonical_min_similarity => best
                .term
                .canonical
                .clone()
                .map_or(CanonicalMapping::Unmapped, CanonicalMapping::Mapped),
            _ => CanonicalMapping::Unmapped,
        };
        debug!(term, mapping = %mapping, "resolved canonical");
        Ok(mapping)
    }

    /// Matches for `term` in every domain other than `source_domain`,
    /// grouped by domain, each group highest similarity first.
    pub fn cross_domain_matches(
        &self,
        term: &str,
        source_domain: &str,
        min_similarity: f32,
    ) -> Result<BTreeMap<String, Vec<MatchResult>>> {
        let results = self.search(
            term,
            &DomainFilter::All,
            self.config.cross_domain_limit,
            min_similarity,
        )?;

        let mut grouped: BTreeMap<String, Vec<MatchResult>> = BTreeMap::new();
        for result in results {
            if result.term.domain != source_domain {
                grouped
                    .entry(result.term.domain.clone())
                    .or_default()
                    .push(result);
            }
        }
        Ok(grouped)
    }

    /// Every term mapped to exactly `canonical`, in corpus order.
    pub fn search_by_canonical(&self, canonical: &str) -> Result<Vec<Term>> {
        let snapshot = self.require_snapshot()?;
        Ok(snapshot.corpus.mapped_to(canonical).cloned().collect())
    }

    /// Term counts; zero before the first successful load.
    pub fn get_stats(&self) -> CorpusStats {
        self.snapshot()
            .map(|snapshot| snapshot.corpus.stats())
            .unwrap_or_default()
    }

    /// Sorted unique canonical labels; empty before the first load.
    pub fn get_all_canonical_concepts(&self) -> Vec<String> {
        self.snapshot()
            .map(|snapshot| snapshot.corpus.canonical_concepts())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for SemanticMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticMatcher")
            .field("backend", &self.embedder.name())
            .field("config", &self.config)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

fn validate_threshold(min_similarity: f32) -> Result<()> {
    if (0.0..=1.0).contains(&min_similarity) {
        Ok(())
    } else {
        Err(AlignError::InvalidQuery(format!(
            "min_similarity must be within [0, 1], got {min_similarity}"
        )))
    }
}
