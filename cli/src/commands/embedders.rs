use anyhow::Result;
use licita_config::{Config, EmbeddingConfig};
use licita_embed::{all_backends, select_provider};
use yansi::Paint;

pub async fn handle_embedders(config: Config) -> Result<()> {
    println!("Embedding backends (* = configured):");
    for backend in all_backends() {
        let marker = if backend == config.embedding.backend { "*" } else { " " };
        let candidate = EmbeddingConfig {
            backend,
            ..config.embedding.clone()
        };

        let status = match select_provider(&candidate) {
            Ok(provider) if provider.is_available().await => "available".green().to_string(),
            Ok(_) => "unreachable".yellow().to_string(),
            Err(err) => format!("{} ({})", "unavailable".red(), err),
        };
        println!("{} {:<8} {}", marker, backend.as_str(), status);
    }
    Ok(())
}
