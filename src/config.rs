use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::terms::TermSource;

const CONFIG_ENV: &str = "TERMALIGN_CONFIG";
const PROJECT_CONFIG: &str = "termalign.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_sources")]
    pub sources: Vec<TermSource>,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            embedding: EmbeddingConfig::default(),
            matcher: MatcherConfig::default(),
        }
    }
}

fn default_sources() -> Vec<TermSource> {
    vec![
        TermSource::required("data/legal_terms.json", "Legal"),
        TermSource::required("data/restdev_terms.json", "Restaurant Development"),
        TermSource::optional("data/finance_terms.json", "Finance"),
    ]
}

impl Config {
    /// Load configuration.
    ///
    /// Layers, later wins: defaults, then either the explicit file
    /// (`--config` or `TERMALIGN_CONFIG`) or the global and project files,
    /// then `TERMALIGN_*` environment variables. Relative source paths are
    /// resolved against `project_root`.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                AlignError::Config(format!("config file not found: {}", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.resolve_sources(project_root);
        config.validate()?;

        Ok(config)
    }

    /// Parse a single TOML document layered over the defaults.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| AlignError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("termalign/config.toml"))
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&project_root.join(PROJECT_CONFIG))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| AlignError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| AlignError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(sources) = patch.sources {
            self.sources = sources;
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.matcher {
            self.matcher.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `TERMALIGN_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        if let Some(value) = env.string("TERMALIGN_EMBEDDING_BACKEND") {
            self.embedding.backend = value;
        }
        if let Some(value) = env.parse::<u32>("TERMALIGN_EMBEDDING_DIMS")? {
            self.embedding.dims = value;
        }
        if let Some(value) = env.string("TERMALIGN_EMBEDDING_MODEL") {
            self.embedding.model = Some(value);
        }
        if let Some(value) = env.string("TERMALIGN_EMBEDDING_BASE_URL") {
            self.embedding.base_url = Some(value);
        }
        if let Some(value) = env.string("TERMALIGN_EMBEDDING_API_KEY_ENV") {
            self.embedding.api_key_env = Some(value);
        }
        if let Some(value) = env.parse::<u64>("TERMALIGN_EMBEDDING_TIMEOUT_MS")? {
            self.embedding.timeout_ms = value;
        }

        if let Some(value) = env.parse::<usize>("TERMALIGN_TOP_K")? {
            self.matcher.default_top_k = value;
        }
        if let Some(value) = env.parse::<f32>("TERMALIGN_MIN_SIMILARITY")? {
            self.matcher.default_min_similarity = value;
        }
        if let Some(value) = env.parse::<f32>("TERMALIGN_CANONICAL_MIN_SIMILARITY")? {
            self.matcher.canonical_min_similarity = value;
        }
        if let Some(value) = env.parse::<f32>("TERMALIGN_CROSS_DOMAIN_MIN_SIMILARITY")? {
            self.matcher.cross_domain_min_similarity = value;
        }
        if let Some(value) = env.parse::<usize>("TERMALIGN_CROSS_DOMAIN_LIMIT")? {
            self.matcher.cross_domain_limit = value;
        }

        Ok(())
    }

    fn resolve_sources(&mut self, project_root: &Path) {
        for source in &mut self.sources {
            if source.path.is_relative() {
                source.path = project_root.join(&source.path);
            }
        }
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<()> {
        if self.embedding.dims == 0 {
            return Err(AlignError::Config(
                "embedding.dims must be greater than 0".to_string(),
            ));
        }
        for (key, value) in [
            ("matcher.default_min_similarity", self.matcher.default_min_similarity),
            ("matcher.canonical_min_similarity", self.matcher.canonical_min_similarity),
            (
                "matcher.cross_domain_min_similarity",
                self.matcher.cross_domain_min_similarity,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AlignError::Config(format!(
                    "{key} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.matcher.cross_domain_limit == 0 {
            return Err(AlignError::Config(
                "matcher.cross_domain_limit must be greater than 0".to_string(),
            ));
        }
        for source in &self.sources {
            if source.domain.trim().is_empty() {
                return Err(AlignError::Config(format!(
                    "source {} has an empty domain",
                    source.path.display()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `hash`, `api` or `local`
    pub backend: String,
    pub dims: u32,
    /// Model identifier for the `api` and `local` backends
    pub model: Option<String>,
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Upper bound for one embedding call; 0 disables the bound
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: "hash".to_string(),
            dims: 384,
            model: None,
            base_url: None,
            api_key_env: None,
            timeout_ms: 30_000,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.dims {
            self.dims = value;
        }
        if let Some(value) = patch.model {
            self.model = Some(value);
        }
        if let Some(value) = patch.base_url {
            self.base_url = Some(value);
        }
        if let Some(value) = patch.api_key_env {
            self.api_key_env = Some(value);
        }
        if let Some(value) = patch.timeout_ms {
            self.timeout_ms = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Result count when a search does not ask for one
    pub default_top_k: usize,
    /// Similarity floor when a search does not give one
    pub default_min_similarity: f32,
    /// Below this top similarity a term resolves to "unmapped"
    pub canonical_min_similarity: f32,
    /// Default floor for cross-domain matches
    pub cross_domain_min_similarity: f32,
    /// Candidate pool for cross-domain grouping
    pub cross_domain_limit: usize,
}

/// Thresholds suit the default `hash` backend, where a shared head word
/// ("ground lease" / "site lease") scores about 0.75 and unrelated terms stay
/// under 0.25.
impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            default_top_k: 10,
            default_min_similarity: 0.0,
            canonical_min_similarity: 0.5,
            cross_domain_min_similarity: 0.7,
            cross_domain_limit: 50,
        }
    }
}

impl MatcherConfig {
    fn merge(&mut self, patch: MatcherPatch) {
        if let Some(value) = patch.default_top_k {
            self.default_top_k = value;
        }
        if let Some(value) = patch.default_min_similarity {
            self.default_min_similarity = value;
        }
        if let Some(value) = patch.canonical_min_similarity {
            self.canonical_min_similarity = value;
        }
        if let Some(value) = patch.cross_domain_min_similarity {
            self.cross_domain_min_similarity = value;
        }
        if let Some(value) = patch.cross_domain_limit {
            self.cross_domain_limit = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub sources: Option<Vec<TermSource>>,
    pub embedding: Option<EmbeddingPatch>,
    pub matcher: Option<MatcherPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingPatch {
    pub backend: Option<String>,
    pub dims: Option<u32>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MatcherPatch {
    pub default_top_k: Option<usize>,
    pub default_min_similarity: Option<f32>,
    pub canonical_min_similarity: Option<f32>,
    pub cross_domain_min_similarity: Option<f32>,
    pub cross_domain_limit: Option<usize>,
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.string(key) {
            Some(value) => value.trim().parse::<T>().map(Some).map_err(|err| {
                AlignError::Config(format!("invalid {key} value {value}: {err}"))
            }),
            None => Ok(None),
        }
    }
}
