//! Verdict policy thresholds

use serde::{Deserialize, Serialize};

/// Thresholds consumed by the conformity analyzer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConformityConfig {
    /// Confidence at or above which a requirement may be marked conforme
    #[serde(default = "default_high_confidence")]
    pub high_confidence_threshold: f32,

    /// Confidence below which the reasoning calls the evidence weak
    #[serde(default = "default_low_confidence")]
    pub low_confidence_threshold: f32,

    /// Evidence pieces required for a conforme verdict
    #[serde(default = "default_min_evidence_count")]
    pub min_evidence_count: usize,

    /// Best relevance below this value adds a data-quality warning
    #[serde(default = "default_weak_relevance")]
    pub weak_relevance_threshold: f32,
}

impl Default for ConformityConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: default_high_confidence(),
            low_confidence_threshold: default_low_confidence(),
            min_evidence_count: default_min_evidence_count(),
            weak_relevance_threshold: default_weak_relevance(),
        }
    }
}

impl crate::validation::Validate for ConformityConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_positive, validate_range};

        validate_range(
            "conformity.high_confidence_threshold",
            self.high_confidence_threshold,
            0.0,
            1.0,
        )?;
        validate_range(
            "conformity.low_confidence_threshold",
            self.low_confidence_threshold,
            0.0,
            1.0,
        )?;
        validate_range(
            "conformity.weak_relevance_threshold",
            self.weak_relevance_threshold,
            0.0,
            1.0,
        )?;
        validate_positive("conformity.min_evidence_count", self.min_evidence_count, 0)?;

        if self.low_confidence_threshold > self.high_confidence_threshold {
            return Err(ConfigError::ValidationError {
                field: "conformity.low_confidence_threshold".to_string(),
                message: format!(
                    "low_confidence_threshold ({}) must be <= high_confidence_threshold ({})",
                    self.low_confidence_threshold, self.high_confidence_threshold
                ),
            });
        }

        Ok(())
    }
}

fn default_high_confidence() -> f32 {
    0.85
}

fn default_low_confidence() -> f32 {
    0.60
}

fn default_min_evidence_count() -> usize {
    2
}

fn default_weak_relevance() -> f32 {
    0.75
}
