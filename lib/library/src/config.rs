use std::path::Path;

use serde::{Deserialize, Serialize};
use sfxsort_core::{Error, Result};
use sfxsort_similarity::SimilarityConfig;

/// Settings for one library scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub similarity: SimilarityConfig,
    /// Below this many labelled items the similarity pass is skipped
    pub min_corpus_size: usize,
    /// Rule-labelled items under this confidence stay out of the training corpus
    pub min_training_confidence: f64,
    /// Non-manual items under this rule confidence are re-queried as well
    pub requery_below_confidence: f64,
    /// A similarity hit becomes `clamp(sim * scale, 0.10, 0.98)`
    pub similarity_confidence_scale: f64,
    /// Items per batch between cancellation checks
    pub chunk_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            min_corpus_size: 200,
            min_training_confidence: 0.0,
            requery_below_confidence: 0.0,
            similarity_confidence_scale: 1.25,
            chunk_size: 300,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.similarity.validate()?;

        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be at least 1".to_string()));
        }
        let scale = self.similarity_confidence_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "similarity_confidence_scale must be positive, got {}",
                scale
            )));
        }
        for (name, value) in [
            ("min_training_confidence", self.min_training_confidence),
            ("requery_below_confidence", self.requery_below_confidence),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_corpus_size, 200);
        assert_eq!(config.chunk_size, 300);
        assert_eq!(config.similarity.top_k, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = PipelineConfig::from_json_str(
            r#"{"min_corpus_size": 10, "similarity": {"min_similarity": 0.3}}"#,
        )
        .unwrap();
        assert_eq!(config.min_corpus_size, 10);
        assert_eq!(config.similarity.min_similarity, 0.3);
        assert_eq!(config.similarity.top_k, 9);
        assert_eq!(config.chunk_size, 300);
    }

    #[test]
    fn test_invalid_values() {
        let bad = [
            PipelineConfig { chunk_size: 0, ..Default::default() },
            PipelineConfig { similarity_confidence_scale: 0.0, ..Default::default() },
            PipelineConfig { similarity_confidence_scale: f64::NAN, ..Default::default() },
            PipelineConfig { min_training_confidence: 1.2, ..Default::default() },
            PipelineConfig { requery_below_confidence: -0.5, ..Default::default() },
            PipelineConfig {
                similarity: SimilarityConfig { top_k: 0, ..Default::default() },
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "{config:?}");
        }
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            PipelineConfig::from_json_str("{not json"),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"chunk_size": 0}"#),
            Err(Error::InvalidConfig(_))
        ));
    }
}
