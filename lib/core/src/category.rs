use serde::{Deserialize, Serialize};

/// Tier1 used for anything the rules could not place
pub const UNSORTED: &str = "Unsorted";

/// Tier2 value that collapses into its Tier1 in the effective category
pub const GENERAL: &str = "General";

/// Result of classifying one item: a two-level category and a confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub tier1: String,
    pub tier2: String,
    /// Always within [0, 1]
    pub confidence: f64,
}

impl Classification {
    #[inline]
    #[must_use]
    pub fn new(tier1: impl Into<String>, tier2: impl Into<String>, confidence: f64) -> Self {
        Self {
            tier1: tier1.into(),
            tier2: tier2.into(),
            confidence: clamp_unit(confidence),
        }
    }

    /// The ("Unsorted", "Unsorted", 0.0) result for inputs with nothing to go on
    #[must_use]
    pub fn unsorted() -> Self {
        Self::new(UNSORTED, UNSORTED, 0.0)
    }

    /// `tier1` alone when `tier2` is empty or "General", else `tier1/tier2`
    pub fn category(&self) -> String {
        effective_category(&self.tier1, &self.tier2)
    }

    pub fn is_unsorted(&self) -> bool {
        self.tier1.eq_ignore_ascii_case(UNSORTED)
    }
}

/// Join a tier pair into the category string used for grouping
pub fn effective_category(tier1: &str, tier2: &str) -> String {
    let tier2 = tier2.trim();
    if tier2.is_empty() || tier2 == GENERAL {
        tier1.to_string()
    } else {
        format!("{}/{}", tier1, tier2)
    }
}

/// Clamp to [0, 1], mapping NaN to 0
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
