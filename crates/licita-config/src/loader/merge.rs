//! Configuration merging logic
//!
//! A field from the overlay wins only when it differs from the default, so
//! a sparse file or env overlay never resets values set by an earlier layer.

use crate::types::{
    ChunkingConfig, ConformityConfig, CoreConfig, EmbeddingConfig, RetrievalConfig,
};
use crate::Config;

pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.core = merge_core(base.core, overlay.core);
    base.chunking = merge_chunking(base.chunking, overlay.chunking);
    base.embedding = merge_embedding(base.embedding, overlay.embedding);
    base.retrieval = merge_retrieval(base.retrieval, overlay.retrieval);
    base.conformity = merge_conformity(base.conformity, overlay.conformity);
    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn pick_f32(base: f32, overlay: f32, default: f32) -> f32 {
    if (overlay - default).abs() > 0.0001 {
        overlay
    } else {
        base
    }
}

fn merge_core(base: CoreConfig, overlay: CoreConfig) -> CoreConfig {
    let default = CoreConfig::default();
    CoreConfig {
        knowledge_base_dir: pick(
            base.knowledge_base_dir,
            overlay.knowledge_base_dir,
            default.knowledge_base_dir,
        ),
        index_dir: pick(base.index_dir, overlay.index_dir, default.index_dir),
        include_paths: pick(
            base.include_paths,
            overlay.include_paths,
            default.include_paths,
        ),
        exclude_paths: if !overlay.exclude_paths.is_empty() {
            overlay.exclude_paths
        } else {
            base.exclude_paths
        },
    }
}

fn merge_chunking(base: ChunkingConfig, overlay: ChunkingConfig) -> ChunkingConfig {
    let default = ChunkingConfig::default();
    ChunkingConfig {
        chunk_size: pick(base.chunk_size, overlay.chunk_size, default.chunk_size),
        chunk_overlap: pick(
            base.chunk_overlap,
            overlay.chunk_overlap,
            default.chunk_overlap,
        ),
    }
}

fn merge_embedding(base: EmbeddingConfig, overlay: EmbeddingConfig) -> EmbeddingConfig {
    let default = EmbeddingConfig::default();
    EmbeddingConfig {
        backend: pick(base.backend, overlay.backend, default.backend),
        model_name: pick(base.model_name, overlay.model_name, default.model_name),
        dimension: pick(base.dimension, overlay.dimension, default.dimension),
        api_base: overlay.api_base.or(base.api_base),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, default.timeout_secs),
        batch_size: pick(base.batch_size, overlay.batch_size, default.batch_size),
    }
}

fn merge_retrieval(base: RetrievalConfig, overlay: RetrievalConfig) -> RetrievalConfig {
    let default = RetrievalConfig::default();
    RetrievalConfig {
        top_k: pick(base.top_k, overlay.top_k, default.top_k),
        similarity_threshold: pick_f32(
            base.similarity_threshold,
            overlay.similarity_threshold,
            default.similarity_threshold,
        ),
    }
}

fn merge_conformity(base: ConformityConfig, overlay: ConformityConfig) -> ConformityConfig {
    let default = ConformityConfig::default();
    ConformityConfig {
        high_confidence_threshold: pick_f32(
            base.high_confidence_threshold,
            overlay.high_confidence_threshold,
            default.high_confidence_threshold,
        ),
        low_confidence_threshold: pick_f32(
            base.low_confidence_threshold,
            overlay.low_confidence_threshold,
            default.low_confidence_threshold,
        ),
        min_evidence_count: pick(
            base.min_evidence_count,
            overlay.min_evidence_count,
            default.min_evidence_count,
        ),
        weak_relevance_threshold: pick_f32(
            base.weak_relevance_threshold,
            overlay.weak_relevance_threshold,
            default.weak_relevance_threshold,
        ),
    }
}
