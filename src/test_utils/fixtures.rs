use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

use crate::terms::{Corpus, Term};

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl UnitTestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Create a JSON term file.
    pub fn create_term_file(&self, relative_path: &str, content: &Value) -> PathBuf {
        let body = serde_json::to_string_pretty(content).expect("Failed to encode term file");
        self.create_file(relative_path, &body)
    }

    /// Path inside the fixture that is guaranteed not to exist.
    pub fn missing_path(&self, relative_path: &str) -> PathBuf {
        self.data_path.join(relative_path)
    }
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}

pub const GROUND_LEASE: &str = "Agreements>RealEstate>GroundLease";
pub const HR_POLICIES: &str = "Policies>HR";

/// Three-term corpus shared by the matcher scenarios: two lease terms from
/// different domains mapped to one concept, plus an unrelated HR term.
pub fn lease_corpus() -> Corpus {
    Corpus::new(vec![
        Term::new("ground lease", "Legal").with_canonical(GROUND_LEASE),
        Term::new("site lease", "RestDev").with_canonical(GROUND_LEASE),
        Term::new("employee handbook", "HR").with_canonical(HR_POLICIES),
    ])
}
