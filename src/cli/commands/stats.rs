//! termalign stats - Show what was loaded.

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct StatsArgs {}

pub fn run(ctx: &AppContext, _args: &StatsArgs) -> Result<()> {
    let stats = ctx.matcher.get_stats();

    match ctx.output_format {
        OutputFormat::Json => emit_json(
            &robot_ok(serde_json::json!({
                "total": stats.total,
                "per_domain": stats.per_domain,
                "backend": ctx.matcher.embedder().name(),
                "dims": ctx.matcher.embedder().dims(),
            }))
            .with_warnings(&ctx.warnings),
        ),
        OutputFormat::Jsonl => emit_jsonl(&[&stats]),
        OutputFormat::Tsv => {
            let rows: Vec<_> = stats.per_domain.iter().collect();
            emit_tsv(&["domain", "terms"], &rows, |(domain, count)| {
                vec![(*domain).clone(), count.to_string()]
            });
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            let mut layout = HumanLayout::new(ctx.output_format.use_colors());
            layout
                .title("Term store")
                .kv("Total terms", &stats.total.to_string())
                .kv(
                    "Embedding backend",
                    &format!(
                        "{} ({} dims)",
                        ctx.matcher.embedder().name(),
                        ctx.matcher.embedder().dims()
                    ),
                )
                .blank()
                .section("Per domain");
            for (domain, count) in &stats.per_domain {
                layout.kv(domain, &count.to_string());
            }
            if !ctx.warnings.is_empty() {
                layout.blank().section("Warnings");
                for warning in &ctx.warnings {
                    layout.bullet(warning);
                }
            }
            emit_human(layout);
            Ok(())
        }
    }
}
