//! Komawari CLI binary.
//!
//! This binary provides command-line access to Komawari's functionality:
//! - Split a novel into labeled cuts (with or without an oracle)
//! - Extract a character relationship graph
//! - Look up cuts for a character, draft character sheets, propose rewrites

use clap::Parser;
use komawari::{KomawariConfig, ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_brief, run_cut, run_graph, run_sheet, run_variants};

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let observability = ObservabilityConfig::new()
        .with_verbose(cli.verbose)
        .with_json_logs(cli.json_logs);
    init_observability(&observability)?;

    let config = KomawariConfig::load_with(cli.config.as_deref())?;

    match cli.command {
        Commands::Cut(args) => run_cut(&args, &config).await?,
        Commands::Graph {
            input,
            format,
            output,
        } => run_graph(&input, format, output.as_deref(), &config).await?,
        Commands::Brief { cuts, name, limit } => run_brief(&cuts, &name, limit)?,
        Commands::Variants {
            text,
            style_hint,
            count,
        } => run_variants(&text, &style_hint, count, &config).await?,
        Commands::Sheet {
            cuts,
            name,
            limit,
            style_hint,
        } => run_sheet(&cuts, &name, limit, &style_hint, &config).await?,
    }

    Ok(())
}
