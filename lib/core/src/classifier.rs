//! Deterministic, table-driven category inference for a single path

use crate::category::{Classification, UNSORTED};
use crate::rules::{RuleSet, Tiers};
use crate::text::{normalize, word_tokens, PathParts, MAX_PARENT_SEGMENTS};
use ahash::AHashSet;

/// Confidence of a prefix-table hit, independent of the rest of the name
pub const PREFIX_CONFIDENCE: f64 = 0.92;

/// Confidence when only the parent folder name is left to go on
pub const FOLDER_FALLBACK_CONFIDENCE: f64 = 0.15;

const SCORED_MIN_CONFIDENCE: f64 = 0.10;
const SCORED_MAX_CONFIDENCE: f64 = 0.98;

/// Applies the naming-convention tables to one path.
///
/// Stateless and `Sync`: one instance can classify any number of files
/// from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct RuleBasedClassifier {
    rules: &'static RuleSet,
}

impl Default for RuleBasedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedClassifier {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleSet::builtin(),
        }
    }

    pub fn rules(&self) -> &'static RuleSet {
        self.rules
    }

    /// Classify a path. Never fails; unknown names degrade to the folder
    /// fallback or to ("Unsorted", "Unsorted", 0.0). Table hits ignore case;
    /// the folder fallback keeps the folder's own spelling.
    pub fn infer(&self, path: &str) -> Classification {
        let parts = PathParts::parse(path);

        if let Some(tiers) = self.rules.lookup_prefix(parts.leading_token()) {
            return Classification::new(tiers.tier1, tiers.tier2, PREFIX_CONFIDENCE);
        }

        let scores = self.score(&parts);
        if let Some((winner, margin)) = scores.winner() {
            let confidence = scored_confidence(winner.score, margin);
            return Classification::new(winner.tiers.tier1, winner.tiers.tier2, confidence);
        }

        match parts.last_parent() {
            Some(folder) => Classification::new(UNSORTED, folder, FOLDER_FALLBACK_CONFIDENCE),
            None => Classification::unsorted(),
        }
    }

    /// Run the vendor, phrase and token passes and return every bucket.
    pub fn score(&self, parts: &PathParts<'_>) -> ScoreBoard {
        let mut board = ScoreBoard::default();

        for rule in &self.rules.vendors {
            if rule.pattern.is_match(parts.stem) {
                board.add(rule.tiers, rule.weight);
            }
        }

        let skip = parts.parents.len().saturating_sub(MAX_PARENT_SEGMENTS);
        let mut combined = parts.parents[skip..].join(" ");
        combined.push(' ');
        combined.push_str(parts.stem);
        let text = normalize(&combined);

        for rule in self.rules.phrases {
            let hits = rule.phrases.iter().filter(|p| text.contains(*p)).count();
            if hits > 0 {
                board.add(rule.tiers, hits as f64 * rule.weight_per_hit);
            }
        }

        let words: AHashSet<String> = word_tokens(&text).collect();
        for rule in self.rules.tokens {
            let hits = rule.tokens.iter().filter(|t| words.contains(**t)).count();
            if hits > 0 {
                board.add(rule.tiers, hits as f64 * rule.weight_per_hit);
            }
        }

        board
    }
}

/// Accumulated score for one (Tier1, Tier2) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub tiers: Tiers,
    pub score: f64,
}

/// Score buckets in the order they were first touched
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    buckets: Vec<Bucket>,
}

impl ScoreBoard {
    pub fn add(&mut self, tiers: Tiers, weight: f64) {
        match self.buckets.iter_mut().find(|b| b.tiers == tiers) {
            Some(bucket) => bucket.score += weight,
            None => self.buckets.push(Bucket { tiers, score: weight }),
        }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// The highest-scoring bucket and its margin over the runner-up.
    /// Ties keep the bucket touched first. `None` when nothing scored.
    pub fn winner(&self) -> Option<(Bucket, f64)> {
        let mut best: Option<Bucket> = None;
        let mut runner_up = 0.0_f64;

        for bucket in self.buckets.iter().filter(|b| b.score > 0.0) {
            match best {
                Some(current) if bucket.score <= current.score => {
                    runner_up = runner_up.max(bucket.score);
                }
                Some(current) => {
                    runner_up = runner_up.max(current.score);
                    best = Some(*bucket);
                }
                None => best = Some(*bucket),
            }
        }

        best.map(|b| (b, b.score - runner_up))
    }
}

/// Stepped mapping from a winning score to a confidence, lowered when the
/// runner-up is close.
pub fn scored_confidence(score: f64, margin: f64) -> f64 {
    let base: f64 = if score >= 80.0 {
        0.95
    } else if score >= 55.0 {
        0.88
    } else if score >= 35.0 {
        0.78
    } else if score >= 22.0 {
        0.65
    } else {
        0.45
    };

    let penalty: f64 = if margin <= 2.0 {
        0.18
    } else if margin <= 6.0 {
        0.12
    } else {
        0.0
    };

    (base - penalty).clamp(SCORED_MIN_CONFIDENCE, SCORED_MAX_CONFIDENCE)
}
