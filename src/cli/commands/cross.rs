//! termalign cross - Find equivalent terms in other domains.

use std::collections::BTreeMap;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{
    HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, format_similarity,
    robot_ok,
};
use crate::error::Result;
use crate::matcher::MatchResult;

#[derive(Args, Debug)]
pub struct CrossArgs {
    /// Term as used by the source domain
    pub term: String,

    /// Domain the term comes from; its own terms are excluded
    #[arg(long = "from", value_name = "DOMAIN")]
    pub source_domain: String,

    /// Minimum similarity, 0.0-1.0 (default: matcher.cross_domain_min_similarity)
    #[arg(long)]
    pub min_similarity: Option<f32>,
}

pub fn run(ctx: &AppContext, args: &CrossArgs) -> Result<()> {
    let min_similarity = args
        .min_similarity
        .unwrap_or(ctx.config.matcher.cross_domain_min_similarity);
    let grouped = ctx
        .matcher
        .cross_domain_matches(&args.term, &args.source_domain, min_similarity)?;

    match ctx.output_format {
        OutputFormat::Json => emit_json(
            &robot_ok(serde_json::json!({
                "term": args.term,
                "source_domain": args.source_domain,
                "min_similarity": min_similarity,
                "matches": grouped,
            }))
            .with_warnings(&ctx.warnings),
        ),
        OutputFormat::Jsonl => emit_jsonl(&flatten(&grouped)),
        OutputFormat::Tsv => {
            emit_tsv(
                &["domain", "term", "canonical", "similarity"],
                &flatten(&grouped),
                |r| {
                    vec![
                        r.domain().to_string(),
                        r.text().to_string(),
                        r.canonical().unwrap_or_default().to_string(),
                        format!("{:.4}", r.similarity),
                    ]
                },
            );
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            let colors = ctx.output_format.use_colors();
            let mut layout = HumanLayout::new(colors);
            layout.title(&format!(
                "\"{}\" ({}) in other domains",
                args.term, args.source_domain
            ));
            if grouped.is_empty() {
                layout.push_line(format!("No matches at or above {min_similarity:.2}."));
            }
            for (domain, matches) in &grouped {
                layout.section(domain);
                for result in matches {
                    layout.bullet(&format!(
                        "{}  {}",
                        format_similarity(result.similarity, colors),
                        result.text()
                    ));
                }
                layout.blank();
            }
            emit_human(layout);
            Ok(())
        }
    }
}

fn flatten(grouped: &BTreeMap<String, Vec<MatchResult>>) -> Vec<MatchResult> {
    grouped.values().flatten().cloned().collect()
}
