//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod completions;
pub mod concept;
pub mod concepts;
pub mod cross;
pub mod resolve;
pub mod search;
pub mod stats;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args),
        Commands::Resolve(args) => resolve::run(ctx, args),
        Commands::Cross(args) => cross::run(ctx, args),
        Commands::Stats(args) => stats::run(ctx, args),
        Commands::Concepts(args) => concepts::run(ctx, args),
        Commands::Concept(args) => concept::run(ctx, args),
        Commands::Completions(args) => completions::run(args),
    }
}
