use async_trait::async_trait;
use licita_config::Config;
use licita_core::{ConformityVerdict, CoreError, DocumentMetadata, EmbeddingProvider, Requirement, Result};
use licita_embed::HashingProvider;
use licita_engine::{ConformityAnalyzer, RetrievalEngine};
use licita_index::VectorIndex;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

/// Deterministic pseudo-random vectors seeded by the text
struct SeededProvider {
    dimension: usize,
}

impl SeededProvider {
    fn vector(&self, text: &str) -> Vec<f32> {
        let mut state: u64 = 0xcbf29ce484222325;
        for b in text.as_bytes() {
            state ^= *b as u64;
            state = state.wrapping_mul(0x100000001b3);
        }
        (0..self.dimension)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                ((state >> 40) as f32 / (1u64 << 24) as f32) - 0.5
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for SeededProvider {
    fn name(&self) -> &str {
        "seeded"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}

fn config(index_dir: &Path, dimension: usize) -> Config {
    let mut config = Config::default();
    config.core.index_dir = index_dir.to_path_buf();
    config.embedding.dimension = dimension;
    config
}

#[tokio::test]
async fn test_provider_dimension_must_match_config() {
    let dir = tempdir().unwrap();
    let result = RetrievalEngine::new(
        config(dir.path(), 384),
        Arc::new(SeededProvider { dimension: 16 }),
    );
    assert!(matches!(
        result,
        Err(CoreError::DimensionMismatch {
            expected: 384,
            actual: 16
        })
    ));
}

#[tokio::test]
async fn test_stored_snapshot_dimension_must_match() {
    let dir = tempdir().unwrap();
    let mut old = VectorIndex::new(8, dir.path());
    old.add(
        vec![vec![1.0; 8]],
        vec!["antigo".to_string()],
        vec![Default::default()],
    )
    .unwrap();
    old.save().unwrap();

    let result = RetrievalEngine::new(
        config(dir.path(), 16),
        Arc::new(SeededProvider { dimension: 16 }),
    );
    assert!(matches!(result, Err(CoreError::DimensionMismatch { .. })));
}

#[tokio::test]
async fn test_ingest_search_and_reload() {
    let dir = tempdir().unwrap();
    let engine = RetrievalEngine::new(
        config(dir.path(), 32),
        Arc::new(SeededProvider { dimension: 32 }),
    )
    .unwrap();
    assert!(!engine.stats().await.is_ready);

    engine
        .ingest_document(
            "Prazo de validade da proposta de sessenta dias.",
            DocumentMetadata::new("edital.txt"),
        )
        .await
        .unwrap();
    engine
        .ingest_document(
            "Garantia contratual de cinco por cento.",
            DocumentMetadata::new("contrato.txt"),
        )
        .await
        .unwrap();

    let hits = engine
        .search("Garantia contratual de cinco por cento.", 2)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].metadata.filename, "contrato.txt");
    assert!((hits[0].score - 1.0).abs() < 1e-5);
    assert!(hits[0].score >= hits[1].score);

    let reopened = RetrievalEngine::new(
        config(dir.path(), 32),
        Arc::new(SeededProvider { dimension: 32 }),
    )
    .unwrap();
    assert_eq!(reopened.stats().await.total_documents, 2);

    let (a, b) = tokio::join!(
        reopened.search("Prazo de validade da proposta de sessenta dias.", 1),
        reopened.search("Garantia contratual de cinco por cento.", 1)
    );
    assert_eq!(a.unwrap()[0].metadata.filename, "edital.txt");
    assert_eq!(b.unwrap()[0].metadata.filename, "contrato.txt");
}

#[tokio::test]
async fn test_analyze_with_corroborating_sources() {
    let dir = tempdir().unwrap();
    let kb = tempdir().unwrap();
    let statement = "Atestado de capacidade técnica emitido por pessoa jurídica";
    std::fs::write(kb.path().join("lei.txt"), statement).unwrap();
    std::fs::write(kb.path().join("manual.md"), statement).unwrap();
    std::fs::write(kb.path().join("outro.txt"), "Cronograma físico e financeiro da obra").unwrap();

    let engine = RetrievalEngine::new(
        config(dir.path(), 384),
        Arc::new(HashingProvider::new(384)),
    )
    .unwrap();
    let report = engine.ingest_directory(kb.path()).await.unwrap();
    assert_eq!(report.documents_loaded, 3);

    let analysis = engine
        .analyze(&Requirement::new("REQ-7", statement))
        .await
        .unwrap();
    assert_eq!(analysis.verdict, ConformityVerdict::Conforme);
    assert!(analysis.confidence > 0.99);
    assert_eq!(analysis.evidence.len(), 2);
    assert!(analysis.sources.contains("lei.txt"));
    assert!(analysis.sources.contains("manual.md"));

    let unrelated = engine
        .analyze(&Requirement::new("REQ-8", "seguro garantia bancária"))
        .await
        .unwrap();
    assert_eq!(unrelated.verdict, ConformityVerdict::Revisao);
    assert_eq!(unrelated.confidence, 0.0);

    let stats = engine.verdict_stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.compliance_rate(), 0.5);
}

#[tokio::test]
async fn test_batch_skips_invalid_requirements() {
    let dir = tempdir().unwrap();
    let engine = RetrievalEngine::new(
        config(dir.path(), 64),
        Arc::new(HashingProvider::new(64)),
    )
    .unwrap();
    engine
        .ingest_document("Regularidade fiscal perante a Fazenda.", DocumentMetadata::new("a.txt"))
        .await
        .unwrap();

    let analyses = engine
        .analyze_batch(&[
            Requirement::new("R1", "Regularidade fiscal perante a Fazenda."),
            Requirement::new("R2", "   "),
            Requirement::new("R3", "Balanço patrimonial"),
        ])
        .await;
    let ids: Vec<&str> = analyses.iter().map(|a| a.requirement_id.as_str()).collect();
    assert_eq!(ids, vec!["R1", "R3"]);
    assert_eq!(engine.verdict_stats().total, 2);

    engine.reset_verdict_stats();
    assert_eq!(engine.verdict_stats().total, 0);
}

#[tokio::test]
async fn test_analyzer_over_plain_index() {
    let provider = HashingProvider::new(64);
    let mut index = VectorIndex::new(64, "unused");
    let text = "Declaração de inexistência de fato impeditivo";
    let vector = provider.embed_query(text).await.unwrap();
    index
        .add(vec![vector], vec![text.to_string()], vec![Default::default()])
        .unwrap();

    let analyzer = ConformityAnalyzer::new(Default::default(), Default::default());
    let analyses = analyzer
        .analyze_batch(
            &[Requirement::new("R1", text), Requirement::new("R2", "")],
            &provider,
            &index,
        )
        .await;
    assert_eq!(analyses.len(), 1);
    assert_eq!(analyses[0].evidence.len(), 1);
    // one piece of evidence is never enough
    assert_eq!(analyses[0].verdict, ConformityVerdict::Revisao);
}

#[tokio::test]
async fn test_reingest_does_not_duplicate_evidence() {
    let dir = tempdir().unwrap();
    let kb = tempdir().unwrap();
    let statement = "Comprovação de qualificação econômico-financeira";
    std::fs::write(kb.path().join("lei.txt"), statement).unwrap();

    let engine = RetrievalEngine::new(
        config(dir.path(), 128),
        Arc::new(HashingProvider::new(128)),
    )
    .unwrap();
    engine.ingest_directory(kb.path()).await.unwrap();
    let again = engine.ingest_directory(kb.path()).await.unwrap();
    assert_eq!(again.documents_loaded, 0);
    assert_eq!(again.unchanged_files, vec!["lei.txt"]);
    assert_eq!(engine.stats().await.total_documents, 1);

    let analysis = engine
        .analyze(&Requirement::new("REQ-1", statement))
        .await
        .unwrap();
    assert_eq!(analysis.evidence.len(), 1);
    assert_eq!(analysis.verdict, ConformityVerdict::Revisao);

    engine.clear().await;
    let rebuilt = engine.ingest_directory(kb.path()).await.unwrap();
    assert_eq!(rebuilt.documents_loaded, 1);
    assert_eq!(engine.stats().await.total_documents, 1);
}
