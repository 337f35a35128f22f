use anyhow::{Context, Result};
use licita_config::Config;
use licita_engine::RetrievalEngine;

pub async fn handle_stats(config: Config) -> Result<()> {
    let index_dir = config.core.index_dir.clone();
    let engine = RetrievalEngine::from_config(config).context("failed to initialize engine")?;
    let stats = engine.stats().await;

    println!("Index directory: {}", index_dir.display());
    println!("Provider:        {}", engine.provider().name());
    println!("Dimension:       {}", stats.dimension);
    println!("Entries:         {}", stats.total_documents);
    println!("Ready:           {}", if stats.is_ready { "yes" } else { "no" });
    Ok(())
}
