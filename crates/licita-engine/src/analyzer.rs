use crate::stats::VerdictStatistics;
use licita_config::{ConformityConfig, RetrievalConfig};
use licita_core::error::{CoreError, Result};
use licita_core::{
    ConformityAnalysis, ConformityVerdict, EmbeddingProvider, Evidence, Requirement, SearchHit,
};
use licita_index::VectorIndex;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error};

/// Requirement to verdict: query, retrieve, filter, score, decide
///
/// Holds no state besides the verdict counters, so one analyzer can be
/// shared by concurrent callers.
#[derive(Debug)]
pub struct ConformityAnalyzer {
    retrieval: RetrievalConfig,
    policy: ConformityConfig,
    stats: Mutex<VerdictStatistics>,
}

#[derive(Debug, Clone, Copy)]
struct EvidenceSummary {
    count: usize,
    mean: f32,
    max: f32,
}

impl EvidenceSummary {
    fn of(evidence: &[Evidence]) -> Self {
        if evidence.is_empty() {
            return Self {
                count: 0,
                mean: 0.0,
                max: 0.0,
            };
        }
        let sum: f32 = evidence.iter().map(|e| e.relevance).sum();
        let max = evidence.iter().map(|e| e.relevance).fold(0.0_f32, f32::max);
        Self {
            count: evidence.len(),
            mean: sum / evidence.len() as f32,
            max,
        }
    }
}

impl ConformityAnalyzer {
    pub fn new(retrieval: RetrievalConfig, policy: ConformityConfig) -> Self {
        Self {
            retrieval,
            policy,
            stats: Mutex::new(VerdictStatistics::default()),
        }
    }

    pub fn top_k(&self) -> usize {
        self.retrieval.top_k
    }

    /// Retrieval query for a requirement: description plus labelled
    /// category and type when present
    pub fn build_query(requirement: &Requirement) -> Result<String> {
        let description = requirement.description.trim();
        if description.is_empty() {
            return Err(CoreError::InvalidInput(format!(
                "requirement '{}' has an empty description",
                requirement.id
            )));
        }

        let mut parts = vec![description.to_string()];
        if let Some(category) = requirement.category.as_deref().filter(|c| !c.trim().is_empty()) {
            parts.push(format!("categoria: {}", category.trim()));
        }
        if let Some(kind) = requirement.kind.as_deref().filter(|k| !k.trim().is_empty()) {
            parts.push(format!("tipo: {}", kind.trim()));
        }
        Ok(parts.join(" "))
    }

    pub async fn analyze(
        &self,
        requirement: &Requirement,
        provider: &dyn EmbeddingProvider,
        index: &VectorIndex,
    ) -> Result<ConformityAnalysis> {
        let query = Self::build_query(requirement)?;
        let vector = provider.embed_query(&query).await?;
        let hits = index.search(&vector, self.retrieval.top_k)?;
        Ok(self.evaluate(requirement, &query, hits))
    }

    /// Analyze each requirement independently; failures are logged and
    /// left out of the result
    pub async fn analyze_batch(
        &self,
        requirements: &[Requirement],
        provider: &dyn EmbeddingProvider,
        index: &VectorIndex,
    ) -> Vec<ConformityAnalysis> {
        let mut analyses = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            match self.analyze(requirement, provider, index).await {
                Ok(analysis) => analyses.push(analysis),
                Err(err) => error!("Skipping requirement {}: {}", requirement.id, err),
            }
        }
        analyses
    }

    /// Apply the verdict policy to search hits and record the outcome
    pub fn evaluate(
        &self,
        requirement: &Requirement,
        query: &str,
        hits: Vec<SearchHit>,
    ) -> ConformityAnalysis {
        let evidence: Vec<Evidence> = hits
            .iter()
            .filter(|hit| hit.score >= self.retrieval.similarity_threshold)
            .map(Evidence::from_hit)
            .collect();

        let summary = EvidenceSummary::of(&evidence);
        let confidence = confidence(&evidence);
        let verdict = self.verdict(confidence, summary.count);
        let sources: BTreeSet<String> = evidence.iter().map(|e| e.source.clone()).collect();

        debug!(
            "Requirement {}: {} of {} hits kept, confidence {:.3}, verdict {}",
            requirement.id,
            summary.count,
            hits.len(),
            confidence,
            verdict
        );

        let reasoning = self.reasoning(requirement, verdict, confidence, summary);
        let recommendations = self.recommendations(verdict, summary, &sources);

        let mut metadata = BTreeMap::new();
        metadata.insert("query".to_string(), json!(query));
        metadata.insert("hits_retrieved".to_string(), json!(hits.len()));
        metadata.insert("evidence_count".to_string(), json!(summary.count));
        metadata.insert("mean_relevance".to_string(), json!(summary.mean));
        metadata.insert("max_relevance".to_string(), json!(summary.max));
        if let Some(category) = &requirement.category {
            metadata.insert("category".to_string(), json!(category));
        }
        if let Some(priority) = &requirement.priority {
            metadata.insert("priority".to_string(), json!(priority));
        }

        self.lock_stats().record(verdict);

        ConformityAnalysis {
            requirement_id: requirement.id.clone(),
            verdict,
            confidence,
            evidence,
            reasoning,
            recommendations,
            sources,
            metadata,
        }
    }

    pub fn stats(&self) -> VerdictStatistics {
        self.lock_stats().clone()
    }

    pub fn reset_stats(&self) {
        *self.lock_stats() = VerdictStatistics::default();
    }

    fn lock_stats(&self) -> MutexGuard<'_, VerdictStatistics> {
        // counters stay consistent even if a holder panicked
        self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // NaoConforme needs negative evidence, which retrieval alone cannot show
    fn verdict(&self, confidence: f32, evidence_count: usize) -> ConformityVerdict {
        if confidence >= self.policy.high_confidence_threshold
            && evidence_count >= self.policy.min_evidence_count
        {
            ConformityVerdict::Conforme
        } else {
            ConformityVerdict::Revisao
        }
    }

    fn reasoning(
        &self,
        requirement: &Requirement,
        verdict: ConformityVerdict,
        confidence: f32,
        summary: EvidenceSummary,
    ) -> String {
        let label = requirement_label(requirement);

        if summary.count == 0 {
            return format!(
                "Nenhuma evidência relevante foi encontrada na base de conhecimento para {}.",
                label
            );
        }

        match verdict {
            ConformityVerdict::Conforme => format!(
                "{} está suportado por {} evidências com relevância média de {:.2} (confiança {:.2}).",
                capitalize(&label),
                summary.count,
                summary.mean,
                confidence
            ),
            _ if confidence >= self.policy.high_confidence_threshold => format!(
                "Evidências insuficientes para {}: apenas {} trecho(s) encontrado(s), relevância média de {:.2}; são necessários ao menos {}.",
                label, summary.count, summary.mean, self.policy.min_evidence_count
            ),
            _ if confidence < self.policy.low_confidence_threshold => format!(
                "Baixa confiança para {}: {} trecho(s) com relevância média de {:.2} (confiança {:.2}), abaixo do mínimo aceitável.",
                label, summary.count, summary.mean, confidence
            ),
            _ => format!(
                "Confiança moderada para {}: {} trecho(s) com relevância média de {:.2} (confiança {:.2}) não bastam para confirmar a conformidade.",
                label, summary.count, summary.mean, confidence
            ),
        }
    }

    fn recommendations(
        &self,
        verdict: ConformityVerdict,
        summary: EvidenceSummary,
        sources: &BTreeSet<String>,
    ) -> Vec<String> {
        let mut out = Vec::new();

        match verdict {
            ConformityVerdict::Conforme => out.push(
                "Anexar os documentos citados como evidência na proposta.".to_string(),
            ),
            ConformityVerdict::NaoConforme => out.push(
                "Verificar se o requisito pode ser atendido antes de prosseguir com a proposta."
                    .to_string(),
            ),
            ConformityVerdict::Revisao if summary.count == 0 => out.push(
                "Incluir na base de conhecimento documentos que tratem deste requisito."
                    .to_string(),
            ),
            ConformityVerdict::Revisao => out.push(
                "Submeter o requisito à revisão manual de um especialista.".to_string(),
            ),
        }

        if summary.count < self.policy.min_evidence_count {
            out.push(format!(
                "Atenção: apenas {} evidência(s) encontrada(s), o mínimo recomendado é {}.",
                summary.count, self.policy.min_evidence_count
            ));
        }
        if sources.len() == 1 && summary.count > 0 {
            if let Some(source) = sources.iter().next() {
                out.push(format!(
                    "Atenção: todas as evidências vêm de uma única fonte ({}).",
                    source
                ));
            }
        }
        if summary.count > 0 && summary.max < self.policy.weak_relevance_threshold {
            out.push(format!(
                "Atenção: relevância máxima de {:.2} está abaixo de {:.2}, as evidências podem não tratar diretamente do requisito.",
                summary.max, self.policy.weak_relevance_threshold
            ));
        }

        out
    }
}

/// `0.7 * mean + 0.3 * max` of the relevances, clamped to [0, 1];
/// exactly 0 for no evidence
pub fn confidence(evidence: &[Evidence]) -> f32 {
    if evidence.is_empty() {
        return 0.0;
    }
    let summary = EvidenceSummary::of(evidence);
    (0.7 * summary.mean + 0.3 * summary.max).clamp(0.0, 1.0)
}

fn requirement_label(requirement: &Requirement) -> String {
    format!("o requisito {}", requirement.id)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_core::ChunkMetadata;

    fn hit(source: &str, score: f32, chunk_index: usize) -> SearchHit {
        SearchHit {
            text: format!("trecho {} de {}", chunk_index, source),
            score,
            metadata: ChunkMetadata {
                filename: source.to_string(),
                chunk_index,
                ..Default::default()
            },
        }
    }

    fn analyzer() -> ConformityAnalyzer {
        ConformityAnalyzer::new(RetrievalConfig::default(), ConformityConfig::default())
    }

    fn requirement() -> Requirement {
        Requirement::new("REQ-001", "Atestado de capacidade técnica")
    }

    #[test]
    fn test_nothing_above_threshold() {
        let a = analyzer();
        let result = a.evaluate(
            &requirement(),
            "q",
            vec![hit("lei.txt", 0.69, 0), hit("lei.txt", 0.4, 1)],
        );
        assert_eq!(result.verdict, ConformityVerdict::Revisao);
        assert_eq!(result.confidence, 0.0);
        assert!(result.evidence.is_empty());
        assert!(result.sources.is_empty());
        assert!(result.reasoning.contains("Nenhuma evidência"));
    }

    #[test]
    fn test_two_strong_hits_conforme() {
        let a = analyzer();
        let result = a.evaluate(
            &requirement(),
            "q",
            vec![hit("lei.txt", 0.90, 0), hit("decreto.md", 0.88, 3)],
        );
        assert!((result.confidence - 0.893).abs() < 1e-4);
        assert_eq!(result.verdict, ConformityVerdict::Conforme);
        assert_eq!(result.evidence.len(), 2);
        assert_eq!(result.evidence[1].chunk_index, 3);
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_single_strong_hit_needs_review() {
        let a = analyzer();
        let result = a.evaluate(&requirement(), "q", vec![hit("lei.txt", 0.95, 0)]);
        assert_eq!(result.verdict, ConformityVerdict::Revisao);
        assert!(result.reasoning.contains("insuficientes"));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("única fonte")));
        assert!(result.recommendations.iter().any(|r| r.contains("mínimo")));
    }

    #[test]
    fn test_weak_relevance_warning() {
        let a = analyzer();
        let result = a.evaluate(
            &requirement(),
            "q",
            vec![hit("a.txt", 0.72, 0), hit("b.txt", 0.71, 0)],
        );
        assert_eq!(result.verdict, ConformityVerdict::Revisao);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("relevância máxima")));
    }

    #[test]
    fn test_confidence_bounds() {
        let ev = |r: f32| Evidence {
            source: "s".to_string(),
            text: "t".to_string(),
            relevance: r,
            chunk_index: 0,
        };
        assert_eq!(confidence(&[]), 0.0);
        assert!((confidence(&[ev(1.0), ev(1.0)]) - 1.0).abs() < 1e-6);
        let c = confidence(&[ev(0.7), ev(0.8), ev(0.99)]);
        assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn test_query_composition() {
        let req = Requirement::new("R", " Garantia de proposta ")
            .with_category("financeiro")
            .with_kind("documental");
        assert_eq!(
            ConformityAnalyzer::build_query(&req).unwrap(),
            "Garantia de proposta categoria: financeiro tipo: documental"
        );
        assert!(ConformityAnalyzer::build_query(&Requirement::new("R", "  ")).is_err());
    }

    #[test]
    fn test_statistics_and_reset() {
        let a = analyzer();
        a.evaluate(&requirement(), "q", vec![]);
        a.evaluate(
            &requirement(),
            "q",
            vec![hit("a.txt", 0.9, 0), hit("b.txt", 0.9, 1)],
        );
        let stats = a.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.conforme, 1);
        assert_eq!(stats.revisao, 1);

        a.reset_stats();
        assert_eq!(a.stats(), VerdictStatistics::default());
    }
}
