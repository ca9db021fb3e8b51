//! termalign search - Rank terms by semantic similarity to a query.

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{
    HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, format_similarity,
    robot_ok,
};
use crate::error::Result;
use crate::matcher::{DomainFilter, MatchResult};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Restrict results to one domain ("All" for every domain)
    #[arg(long, short, default_value = "All")]
    pub domain: DomainFilter,

    /// Maximum number of results (default: matcher.default_top_k)
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// Minimum similarity, 0.0-1.0 (default: matcher.default_min_similarity)
    #[arg(long)]
    pub min_similarity: Option<f32>,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let top_k = args.limit.unwrap_or(ctx.config.matcher.default_top_k);
    let min_similarity = args
        .min_similarity
        .unwrap_or(ctx.config.matcher.default_min_similarity);

    let results = ctx
        .matcher
        .search(&args.query, &args.domain, top_k, min_similarity)?;

    match ctx.output_format {
        OutputFormat::Json => emit_json(
            &robot_ok(serde_json::json!({
                "query": args.query,
                "domain": args.domain.to_string(),
                "top_k": top_k,
                "min_similarity": min_similarity,
                "count": results.len(),
                "results": results,
            }))
            .with_warnings(&ctx.warnings),
        ),
        OutputFormat::Jsonl => emit_jsonl(&results),
        OutputFormat::Tsv => {
            emit_tsv(
                &["term", "domain", "canonical", "similarity"],
                &results,
                |r| {
                    vec![
                        r.text().to_string(),
                        r.domain().to_string(),
                        r.canonical().unwrap_or_default().to_string(),
                        format!("{:.4}", r.similarity),
                    ]
                },
            );
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            emit_human(layout(args, &results, ctx.output_format.use_colors()));
            Ok(())
        }
    }
}

fn layout(args: &SearchArgs, results: &[MatchResult], colors: bool) -> HumanLayout {
    let mut layout = HumanLayout::new(colors);
    layout.title(&format!("Matches for \"{}\"", args.query));

    if results.is_empty() {
        layout.push_line("No matching terms.");
        return layout;
    }

    for (rank, result) in results.iter().enumerate() {
        let text = if colors {
            result.text().bold().to_string()
        } else {
            result.text().to_string()
        };
        layout.push_line(format!(
            "{:>3}. {}  {}  [{}]",
            rank + 1,
            format_similarity(result.similarity, colors),
            text,
            result.domain()
        ));
        if let Some(canonical) = result.canonical() {
            layout.push_line(format!("       -> {canonical}"));
        }
    }
    layout
}
