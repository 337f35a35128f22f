use anyhow::{Context, Result};
use licita_config::Config;
use licita_core::{ConformityAnalysis, ConformityVerdict, Requirement};
use licita_engine::RetrievalEngine;
use std::fs;
use std::path::Path;
use tracing::warn;
use yansi::Paint;

pub async fn handle_analyze(
    config: Config,
    requirements_path: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let raw = fs::read_to_string(requirements_path)
        .with_context(|| format!("failed to read {}", requirements_path.display()))?;
    let requirements: Vec<Requirement> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of requirements", requirements_path.display()))?;

    let engine = RetrievalEngine::from_config(config).context("failed to initialize engine")?;
    if !engine.stats().await.is_ready {
        warn!("Index is empty; every requirement will need review. Run `licita ingest` first.");
    }

    let analyses = engine.analyze_batch(&requirements).await;
    print_table(&analyses);

    let stats = engine.verdict_stats();
    println!();
    println!(
        "Analyzed {} of {} requirements: {} conforme, {} revisao, {} nao conforme",
        stats.total,
        requirements.len(),
        stats.conforme,
        stats.revisao,
        stats.nao_conforme
    );
    println!(
        "Compliance rate {:.1}%, review rate {:.1}%",
        stats.compliance_rate() * 100.0,
        stats.review_rate() * 100.0
    );

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&analyses)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_table(analyses: &[ConformityAnalysis]) {
    println!(
        "{:<16} {:<14} {:>10} {:>9}",
        "REQUISITO", "VEREDITO", "CONFIANCA", "EVIDENCIAS"
    );
    for analysis in analyses {
        let verdict = format!("{:<14}", analysis.verdict.as_str());
        let verdict = match analysis.verdict {
            ConformityVerdict::Conforme => verdict.green().to_string(),
            ConformityVerdict::NaoConforme => verdict.red().to_string(),
            ConformityVerdict::Revisao => verdict.yellow().to_string(),
        };
        println!(
            "{:<16} {} {:>10.3} {:>9}",
            analysis.requirement_id,
            verdict,
            analysis.confidence,
            analysis.evidence.len()
        );
        for recommendation in &analysis.recommendations {
            println!("    - {}", recommendation);
        }
    }
}
