//! Query-time thresholds for the similarity classifier

use serde::{Deserialize, Serialize};
use sfxsort_core::{Error, Result};

pub const DEFAULT_TOP_K: usize = 9;
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.18;
pub const DEFAULT_MIN_CENTROID_SIMILARITY: f32 = 0.15;

/// Neighbour count and acceptance thresholds for one query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Neighbours that take part in the vote
    pub top_k: usize,
    /// Best neighbour similarity needed to accept the vote winner
    pub min_similarity: f32,
    /// Centroid similarity needed to accept the fallback category
    pub min_centroid_similarity: f32,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            min_centroid_similarity: DEFAULT_MIN_CENTROID_SIMILARITY,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".to_string()));
        }
        check_threshold("min_similarity", self.min_similarity)?;
        check_threshold("min_centroid_similarity", self.min_centroid_similarity)?;
        Ok(())
    }
}

fn check_threshold(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}
