use super::spinner;
use anyhow::{Context, Result};
use licita_config::Config;
use licita_engine::RetrievalEngine;
use std::path::PathBuf;
use tracing::info;
use yansi::Paint;

pub async fn handle_ingest(config: Config, dir: Option<PathBuf>, full: bool) -> Result<()> {
    let dir = dir.unwrap_or_else(|| config.core.knowledge_base_dir.clone());
    let engine = RetrievalEngine::from_config(config).context("failed to initialize engine")?;

    if full {
        println!("Full rebuild requested; discarding existing entries...");
        engine.clear().await;
    } else {
        info!(
            "Appending to existing index ({} entries)",
            engine.stats().await.total_documents
        );
    }

    let progress = spinner(format!("Ingesting {}...", dir.display()));
    let result = engine.ingest_directory(&dir).await;
    progress.finish_and_clear();
    let report = result.with_context(|| format!("ingestion of {} failed", dir.display()))?;

    println!(
        "{} {} documents, {} chunks, {} embeddings in {:.2?}",
        "Ingested".green().bold(),
        report.documents_loaded,
        report.total_chunks,
        report.total_embeddings,
        report.time_elapsed
    );
    for (file, chunks) in &report.per_file_breakdown {
        println!("  {:<50} {:>5} chunks", file, chunks);
    }
    if !report.unchanged_files.is_empty() {
        println!(
            "{} unchanged files already indexed, skipped.",
            report.unchanged_files.len()
        );
    }
    if report.has_failures() {
        println!("{} {} files skipped:", "Warning:".yellow().bold(), report.failed_files.len());
        for failed in &report.failed_files {
            println!("  {} ({})", failed.path, failed.reason);
        }
    }

    let stats = engine.stats().await;
    println!("Index now holds {} entries.", stats.total_documents);
    Ok(())
}
