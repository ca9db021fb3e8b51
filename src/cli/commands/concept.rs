//! termalign concept - Terms mapped to one canonical concept.

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ConceptArgs {
    /// Canonical label, exactly as listed by `termalign concepts`
    pub label: String,
}

pub fn run(ctx: &AppContext, args: &ConceptArgs) -> Result<()> {
    let terms = ctx.matcher.search_by_canonical(&args.label)?;

    match ctx.output_format {
        OutputFormat::Json => emit_json(
            &robot_ok(serde_json::json!({
                "canonical": args.label,
                "count": terms.len(),
                "terms": terms,
            }))
            .with_warnings(&ctx.warnings),
        ),
        OutputFormat::Jsonl => emit_jsonl(&terms),
        OutputFormat::Tsv => {
            emit_tsv(&["term", "domain"], &terms, |term| {
                vec![term.text.clone(), term.domain.clone()]
            });
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            let mut layout = HumanLayout::new(ctx.output_format.use_colors());
            layout.title(&args.label);
            if terms.is_empty() {
                layout.push_line("No terms map to this concept.");
            }
            for term in &terms {
                layout.kv(&term.domain, &term.text);
            }
            emit_human(layout);
            Ok(())
        }
    }
}
