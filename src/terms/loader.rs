//! Term source loading
//!
//! Each source is one file of term records for one domain. Two layouts are
//! accepted:
//!
//! ```json
//! { "domain": "Legal", "terms": [ { "term": "ground lease", ... } ] }
//! ```
//!
//! ```json
//! [ { "term": "site lease", "domain": "Restaurant Development", ... } ]
//! ```
//!
//! Files ending in `.yaml`/`.yml` are read as YAML, everything else as JSON.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{Corpus, Term};
use crate::error::{AlignError, Result};

/// One term file and the domain it speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSource {
    pub path: PathBuf,
    /// Domain assigned to records that do not name one
    pub domain: String,
    /// Missing required sources fail the load; missing optional ones are skipped
    #[serde(default = "default_required")]
    pub required: bool,
}

const fn default_required() -> bool {
    true
}

impl TermSource {
    pub fn required(path: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            domain: domain.into(),
            required: true,
        }
    }

    pub fn optional(path: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            domain: domain.into(),
            required: false,
        }
    }

    /// Parse a `DOMAIN=PATH` pair as given on the command line.
    pub fn parse_spec(spec: &str, required: bool) -> Result<Self> {
        let (domain, path) = spec.split_once('=').ok_or_else(|| {
            AlignError::Config(format!("invalid source {spec:?} (expected DOMAIN=PATH)"))
        })?;
        let (domain, path) = (domain.trim(), path.trim());
        if domain.is_empty() || path.is_empty() {
            return Err(AlignError::Config(format!(
                "invalid source {spec:?} (domain and path must be non-empty)"
            )));
        }
        Ok(Self {
            path: PathBuf::from(path),
            domain: domain.to_string(),
            required,
        })
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }
}

/// Result of loading a set of sources.
#[derive(Debug, Clone, Default)]
pub struct LoadedSources {
    pub corpus: Corpus,
    /// Optional sources that did not exist
    pub skipped: Vec<PathBuf>,
}

/// Top-level layout of a term file.
#[derive(Debug)]
enum TermFile {
    Nested(NestedFile),
    Flat(Vec<RawTerm>),
}

#[derive(Debug, Deserialize)]
struct NestedFile {
    terms: Vec<RawTerm>,
    #[serde(default)]
    domain: Option<String>,
}

const SHAPE_HINT: &str = "expected an object with a `terms` array or a bare array of term records";

impl TermFile {
    /// An object with `terms` is the nested layout, an array the flat one.
    /// Anything else has no usable shape.
    fn from_document(document: Value) -> std::result::Result<Self, String> {
        if document
            .as_object()
            .is_some_and(|map| map.contains_key("terms"))
        {
            serde_json::from_value(document)
                .map(Self::Nested)
                .map_err(|err| format!("invalid `terms` object: {err}"))
        } else if document.is_array() {
            serde_json::from_value(document)
                .map(Self::Flat)
                .map_err(|err| format!("invalid term array: {err}"))
        } else {
            Err(SHAPE_HINT.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    #[serde(default)]
    term: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    canonical: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawTerm {
    fn into_term(self, fallback_domain: &str) -> std::result::Result<Term, String> {
        let text = self
            .term
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| "missing or empty `term`".to_string())?;
        let domain = match self.domain {
            Some(domain) if domain.trim().is_empty() => {
                return Err(format!("term {text:?} has an empty `domain`"));
            }
            Some(domain) => domain,
            None => fallback_domain.to_string(),
        };
        Ok(Term {
            text,
            domain,
            canonical: self.canonical.filter(|label| !label.trim().is_empty()),
            extra: self.extra,
        })
    }
}

/// Load every source into a single corpus.
///
/// Required sources contribute first, in the order given, then optional
/// ones. The first failing source aborts the whole load; nothing partial is
/// returned.
pub fn load_sources(sources: &[TermSource]) -> Result<LoadedSources> {
    let ordered = sources
        .iter()
        .filter(|source| source.required)
        .chain(sources.iter().filter(|source| !source.required));

    let mut terms = Vec::new();
    let mut skipped = Vec::new();

    for source in ordered {
        match read_source(source)? {
            Some(mut loaded) => {
                debug!(
                    path = %source.path.display(),
                    domain = %source.domain,
                    count = loaded.len(),
                    "loaded term source"
                );
                terms.append(&mut loaded);
            }
            None => {
                info!(
                    path = %source.path.display(),
                    domain = %source.domain,
                    "optional term source not found, skipping"
                );
                skipped.push(source.path.clone());
            }
        }
    }

    Ok(LoadedSources {
        corpus: Corpus::new(terms),
        skipped,
    })
}

/// Read one source. `Ok(None)` means an optional source is absent.
fn read_source(source: &TermSource) -> Result<Option<Vec<Term>>> {
    let raw = match std::fs::read_to_string(&source.path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            if source.required {
                return Err(AlignError::source_load(source.label(), "file not found"));
            }
            return Ok(None);
        }
        Err(err) => {
            return Err(AlignError::source_load(
                source.label(),
                format!("read failed: {err}"),
            ));
        }
    };

    let document = parse_document(&source.path, &raw)
        .map_err(|reason| AlignError::source_load(source.label(), reason))?;

    let file = TermFile::from_document(document)
        .map_err(|reason| AlignError::source_load(source.label(), reason))?;

    let (records, file_domain) = match file {
        TermFile::Nested(NestedFile { terms, domain }) => (terms, domain),
        TermFile::Flat(terms) => (terms, None),
    };
    let fallback = file_domain
        .filter(|domain| !domain.trim().is_empty())
        .unwrap_or_else(|| source.domain.clone());

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            record.into_term(&fallback).map_err(|reason| {
                AlignError::source_load(source.label(), format!("record {i}: {reason}"))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn parse_document(path: &Path, raw: &str) -> std::result::Result<Value, String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(raw).map_err(|err| format!("invalid YAML: {err}"))
        }
        _ => serde_json::from_str(raw).map_err(|err| format!("invalid JSON: {err}")),
    }
}
