use licita_config::{EmbeddingBackend, EmbeddingConfig};
use licita_core::CoreError;
use licita_embed::{all_backends, select_provider, HashingProvider};
use licita_core::EmbeddingProvider;

#[tokio::test]
async fn test_local_provider_contract() {
    let config = EmbeddingConfig {
        backend: EmbeddingBackend::Local,
        dimension: 32,
        ..Default::default()
    };
    let provider = select_provider(&config).unwrap();
    assert!(provider.is_available().await);

    let texts = vec![
        "Comprovação de regularidade fiscal".to_string(),
        "Qualificação econômico-financeira".to_string(),
    ];
    let vectors = provider.embed_batch(&texts).await.unwrap();
    assert_eq!(vectors.len(), 2);
    assert!(vectors.iter().all(|v| v.len() == 32));

    let query = provider.embed_query(&texts[0]).await.unwrap();
    assert_eq!(query, vectors[0]);
}

#[tokio::test]
async fn test_blank_query_is_invalid() {
    let provider = HashingProvider::new(16);
    assert!(matches!(
        provider.embed_query("").await,
        Err(CoreError::InvalidInput(_))
    ));
}

#[test]
fn test_all_backends_listed() {
    let names: Vec<&str> = all_backends().iter().map(|b| b.as_str()).collect();
    assert_eq!(names, vec!["openai", "ollama", "local"]);
}
