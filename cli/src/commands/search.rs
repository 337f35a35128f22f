use anyhow::{Context, Result};
use licita_config::Config;
use licita_engine::RetrievalEngine;
use yansi::Paint;

const SNIPPET_CHARS: usize = 160;

pub async fn handle_search(config: Config, query: &str, top: usize) -> Result<()> {
    let engine = RetrievalEngine::from_config(config).context("failed to initialize engine")?;

    if !engine.stats().await.is_ready {
        println!("Index is empty. Run `licita ingest` first.");
        return Ok(());
    }

    let hits = engine.search(query, top).await?;
    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{:>2}. {} {} #{}",
            rank + 1,
            format!("{:.3}", hit.score).cyan(),
            hit.metadata.filename.bold(),
            hit.metadata.chunk_index
        );
        let evidence = licita_core::Evidence::from_hit(hit);
        println!("    {}", evidence.snippet(SNIPPET_CHARS).replace('\n', " "));
    }
    Ok(())
}
