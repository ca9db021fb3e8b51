//! termalign concepts - List canonical concepts.

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ConceptsArgs {}

pub fn run(ctx: &AppContext, _args: &ConceptsArgs) -> Result<()> {
    let concepts = ctx.matcher.get_all_canonical_concepts();

    match ctx.output_format {
        OutputFormat::Json => emit_json(
            &robot_ok(serde_json::json!({
                "count": concepts.len(),
                "concepts": concepts,
            }))
            .with_warnings(&ctx.warnings),
        ),
        OutputFormat::Jsonl => emit_jsonl(&concepts),
        OutputFormat::Tsv => {
            emit_tsv(&["canonical"], &concepts, |concept| vec![concept.clone()]);
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            let mut layout = HumanLayout::new(ctx.output_format.use_colors());
            layout.title(&format!("Canonical concepts ({})", concepts.len()));
            for concept in &concepts {
                layout.bullet(concept);
            }
            emit_human(layout);
            Ok(())
        }
    }
}
