mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{
    handle_analyze, handle_embedders, handle_ingest, handle_search, handle_stats, load_config, Cli,
    Commands,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("licita=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("licita=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest { dir, full } => handle_ingest(config, dir, full).await?,
        Commands::Search { query, top } => handle_search(config, &query, top).await?,
        Commands::Analyze {
            requirements,
            output,
        } => handle_analyze(config, &requirements, output.as_deref()).await?,
        Commands::Stats => handle_stats(config).await?,
        Commands::Embedders => handle_embedders(config).await?,
    }

    Ok(())
}
