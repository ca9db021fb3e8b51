use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::matcher::SemanticMatcher;
use crate::terms::{TermSource, load_sources};

const PROJECT_MARKER: &str = "termalign.toml";

/// Everything a command needs: config, a loaded matcher and output settings.
pub struct AppContext {
    pub config: Config,
    pub matcher: SemanticMatcher,
    /// Non-fatal load notes, e.g. optional sources that were not found
    pub warnings: Vec<String>,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_root = Self::find_project_root()?;
        let mut config = Config::load(cli.config.as_deref(), &project_root)?;

        let cli_sources = cli_sources(cli)?;
        if !cli_sources.is_empty() {
            debug!(count = cli_sources.len(), "term sources taken from command line");
            config.sources = cli_sources;
        }

        let matcher = SemanticMatcher::from_config(&config)?;
        let loaded = load_sources(&config.sources)?;
        let warnings = loaded
            .skipped
            .iter()
            .map(|path| format!("optional source not found: {}", path.display()))
            .collect();
        matcher.load_corpus(loaded.corpus)?;

        Ok(Self {
            config,
            matcher,
            warnings,
            output_format: cli.output_format(),
        })
    }

    /// `TERMALIGN_ROOT`, else the nearest ancestor holding `termalign.toml`,
    /// else the working directory.
    fn find_project_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("TERMALIGN_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        Ok(find_upwards(&cwd, PROJECT_MARKER).unwrap_or(cwd))
    }
}

/// `--source` / `--optional-source` pairs; paths stay relative to the
/// working directory.
fn cli_sources(cli: &Cli) -> Result<Vec<TermSource>> {
    let required = cli
        .source
        .iter()
        .map(|spec| TermSource::parse_spec(spec, true));
    let optional = cli
        .optional_source
        .iter()
        .map(|spec| TermSource::parse_spec(spec, false));
    required.chain(optional).collect()
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(name).is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
