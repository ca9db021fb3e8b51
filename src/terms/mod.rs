//! Term store
//!
//! Domain terms as loaded from the per-domain source files, plus the ordered
//! corpus every other component indexes into by position.

mod loader;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use loader::{LoadedSources, TermSource, load_sources};

/// A single domain term.
///
/// `extra` holds every field of the source record that termalign does not
/// interpret. It is written back out flattened, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Literal phrase as used by the domain
    #[serde(rename = "term")]
    pub text: String,
    /// Originating group (e.g. "Legal")
    pub domain: String,
    /// Taxonomy concept this term maps to; `None` means unmapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Passthrough attributes
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Term {
    pub fn new(text: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            domain: domain.into(),
            canonical: None,
            extra: Map::new(),
        }
    }

    /// Builder: set the canonical taxonomy label
    #[must_use]
    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical = Some(canonical.into());
        self
    }

    /// Builder: attach a passthrough attribute
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Ordered collection of every loaded term.
///
/// Positions are stable for the lifetime of the corpus; the similarity
/// index stores row `i` for term `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    terms: Vec<Term>,
}

impl Corpus {
    pub const fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Term> {
        self.terms.get(position)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    /// Term texts in corpus order, ready for a batched embedding call.
    pub fn texts(&self) -> Vec<String> {
        self.terms.iter().map(|term| term.text.clone()).collect()
    }

    /// Total and per-domain term counts.
    pub fn stats(&self) -> CorpusStats {
        let mut per_domain = BTreeMap::new();
        for term in &self.terms {
            *per_domain.entry(term.domain.clone()).or_insert(0) += 1;
        }
        CorpusStats {
            total: self.terms.len(),
            per_domain,
        }
    }

    /// Sorted, de-duplicated canonical labels.
    pub fn canonical_concepts(&self) -> Vec<String> {
        self.terms
            .iter()
            .filter_map(|term| term.canonical.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Terms mapped to exactly `canonical`, in corpus order.
    pub fn mapped_to<'a>(&'a self, canonical: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.terms
            .iter()
            .filter(move |term| term.canonical.as_deref() == Some(canonical))
    }
}

impl FromIterator<Term> for Corpus {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

/// Load statistics reported after every load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total: usize,
    pub per_domain: BTreeMap<String, usize>,
}

impl CorpusStats {
    pub fn domain_count(&self, domain: &str) -> usize {
        self.per_domain.get(domain).copied().unwrap_or(0)
    }
}
