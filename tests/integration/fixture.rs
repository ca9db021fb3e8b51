use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;

use termalign::config::MatcherConfig;
use termalign::embedding::{Embedder, HashEmbedder};
use termalign::matcher::SemanticMatcher;
use termalign::terms::TermSource;

/// Temp directory holding one term file per domain.
pub struct TermDir {
    pub dir: TempDir,
}

impl TermDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn write(&self, name: &str, content: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, serde_json::to_string_pretty(content).unwrap())
            .expect("Failed to write term file");
        path
    }

    pub fn write_raw(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write term file");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Legal (nested shape) and Restaurant Development (flat shape) sources.
    pub fn standard_sources(&self) -> Vec<TermSource> {
        let legal = self.write(
            "legal_terms.json",
            &json!({
                "domain": "Legal",
                "terms": [
                    {"term": "ground lease", "canonical": "Agreements > Real Estate > Ground Lease"},
                    {"term": "estoppel certificate", "canonical": "Agreements > Real Estate > Estoppel"},
                    {"term": "franchise agreement", "canonical": "Agreements > Franchise > Franchise Agreement"}
                ]
            }),
        );
        let restdev = self.write(
            "restdev_terms.json",
            &json!([
                {"term": "site lease", "canonical": "Agreements > Real Estate > Ground Lease", "stage": "site selection"},
                {"term": "development agreement", "canonical": "Agreements > Franchise > Development Agreement"},
                {"term": "trade area"}
            ]),
        );
        vec![
            TermSource::required(legal, "Legal"),
            TermSource::required(restdev, "Restaurant Development"),
            TermSource::optional(self.path("finance_terms.json"), "Finance"),
        ]
    }
}

pub fn hash_matcher() -> SemanticMatcher {
    let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(384));
    SemanticMatcher::new(embedder, MatcherConfig::default())
}
