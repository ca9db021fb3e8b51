//! termalign resolve - Map terms onto the canonical taxonomy.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Terms to resolve
    #[arg(required = true)]
    pub terms: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Resolution {
    term: String,
    canonical: Option<String>,
    mapped: bool,
}

pub fn run(ctx: &AppContext, args: &ResolveArgs) -> Result<()> {
    let resolutions = args
        .terms
        .iter()
        .map(|term| {
            let mapping = ctx.matcher.resolve_canonical(term)?;
            Ok(Resolution {
                term: term.clone(),
                canonical: mapping.label().map(ToString::to_string),
                mapped: mapping.is_mapped(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    match ctx.output_format {
        OutputFormat::Json => emit_json(
            &robot_ok(serde_json::json!({
                "threshold": ctx.config.matcher.canonical_min_similarity,
                "resolutions": resolutions,
            }))
            .with_warnings(&ctx.warnings),
        ),
        OutputFormat::Jsonl => emit_jsonl(&resolutions),
        OutputFormat::Tsv => {
            emit_tsv(&["term", "canonical"], &resolutions, |r| {
                vec![r.term.clone(), display(r)]
            });
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            let colors = ctx.output_format.use_colors();
            let mut layout = HumanLayout::new(colors);
            layout.title("Canonical mapping");
            for resolution in &resolutions {
                let value = if colors && !resolution.mapped {
                    display(resolution).dimmed().to_string()
                } else {
                    display(resolution)
                };
                layout.kv(&resolution.term, &value);
            }
            emit_human(layout);
            Ok(())
        }
    }
}

fn display(resolution: &Resolution) -> String {
    resolution
        .canonical
        .clone()
        .unwrap_or_else(|| "unmapped".to_string())
}
