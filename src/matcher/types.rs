use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::terms::Term;

/// Which domains a search may return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum DomainFilter {
    #[default]
    All,
    Domain(String),
}

impl DomainFilter {
    pub fn domain(name: impl Into<String>) -> Self {
        Self::Domain(name.into())
    }

    /// Domain names compare exactly.
    pub fn matches(&self, domain: &str) -> bool {
        match self {
            Self::All => true,
            Self::Domain(wanted) => wanted == domain,
        }
    }
}

impl FromStr for DomainFilter {
    type Err = Infallible;

    /// `All` and `All Domains`, in any case, select every domain.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("all domains") {
            Ok(Self::All)
        } else {
            Ok(Self::Domain(trimmed.to_string()))
        }
    }
}

impl From<&str> for DomainFilter {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for DomainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Domain(name) => f.write_str(name),
        }
    }
}

/// A term scored against one query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub term: Term,
    pub similarity: f32,
    /// Position of the term in the corpus it was scored from
    pub position: usize,
}

impl MatchResult {
    pub fn text(&self) -> &str {
        &self.term.text
    }

    pub fn domain(&self) -> &str {
        &self.term.domain
    }

    pub fn canonical(&self) -> Option<&str> {
        self.term.canonical.as_deref()
    }
}

/// Flat record: `term`, `domain`, `canonical` (when mapped), passthrough
/// fields in source order, then `similarity`.
impl Serialize for MatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("term", &self.term.text)?;
        map.serialize_entry("domain", &self.term.domain)?;
        if let Some(canonical) = &self.term.canonical {
            map.serialize_entry("canonical", canonical)?;
        }
        for (key, value) in &self.term.extra {
            if key != "similarity" {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry("similarity", &self.similarity)?;
        map.end()
    }
}

/// Outcome of resolving a term to the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalMapping {
    Mapped(String),
    Unmapped,
}

impl CanonicalMapping {
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Mapped(label) => Some(label),
            Self::Unmapped => None,
        }
    }

    pub const fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }
}

impl fmt::Display for CanonicalMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapped(label) => f.write_str(label),
            Self::Unmapped => f.write_str("unmapped"),
        }
    }
}
