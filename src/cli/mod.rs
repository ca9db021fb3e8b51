//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;

/// termalign - align domain terminology against a shared taxonomy
#[derive(Parser, Debug)]
#[command(name = "termalign")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// [DEPRECATED] Enable JSON output for machine consumption.
    /// Use --output-format=json instead.
    #[arg(long, global = true, hide = true)]
    pub robot: bool,

    /// Output format (human, json, jsonl, plain, tsv)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/termalign/config.toml + ./termalign.toml)
    #[arg(long, global = true, env = "TERMALIGN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Required term source as DOMAIN=PATH (repeatable; replaces configured sources)
    #[arg(long, global = true, value_name = "DOMAIN=PATH")]
    pub source: Vec<String>,

    /// Optional term source as DOMAIN=PATH, skipped when the file is missing
    #[arg(long, global = true, value_name = "DOMAIN=PATH")]
    pub optional_source: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective output format: `--output-format`, then `--robot`, then human.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if let Some(fmt) = self.output_format {
            return fmt;
        }
        if self.robot {
            return OutputFormat::Json;
        }
        OutputFormat::Human
    }

    /// Whether errors should be printed as JSON.
    #[must_use]
    pub fn machine_errors(&self) -> bool {
        self.output_format().is_machine_readable()
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank terms by semantic similarity to a query
    Search(commands::search::SearchArgs),

    /// Resolve terms to their canonical taxonomy concept
    Resolve(commands::resolve::ResolveArgs),

    /// Find equivalent terms in other domains
    Cross(commands::cross::CrossArgs),

    /// Show term counts per domain
    Stats(commands::stats::StatsArgs),

    /// List every canonical concept
    Concepts(commands::concepts::ConceptsArgs),

    /// List the terms mapped to one canonical concept
    Concept(commands::concept::ConceptArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
