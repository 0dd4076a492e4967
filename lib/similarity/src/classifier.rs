//! kNN vote over a [`SimilarityIndex`] with a per-category centroid fallback
//!
//! Ordering is fully deterministic:
//! - neighbours with equal similarity rank by document index
//! - equal votes go to the category whose best neighbour ranks first
//! - equal centroid scores go to the category that sorts first

use serde::{Deserialize, Serialize};
use sfxsort_core::{features, SimilarityIndex, TfidfVector};
use tracing::trace;

use crate::config::SimilarityConfig;

/// Which step of the query produced the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Neighbors,
    Centroid,
    Unmatched,
}

/// Outcome of one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// `None` when neither step was confident enough
    pub category: Option<String>,
    /// Cosine similarity in [0, 1]
    pub similarity: f32,
    pub kind: MatchKind,
}

impl SimilarityMatch {
    fn unmatched(similarity: f32) -> Self {
        Self {
            category: None,
            similarity,
            kind: MatchKind::Unmatched,
        }
    }

    pub fn is_match(&self) -> bool {
        self.category.is_some()
    }

    pub fn into_pair(self) -> (Option<String>, f32) {
        (self.category, self.similarity)
    }
}

/// Read-only query interface over a built index.
///
/// Holds no state besides its thresholds, so one instance can be shared by
/// every worker of a scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityClassifier {
    config: SimilarityConfig,
}

impl SimilarityClassifier {
    pub fn new(config: SimilarityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Classify `text` against `index`. Never fails: an empty index and a
    /// query without features come back unmatched. A query whose features
    /// were all unseen at build time skips the vote and goes to the
    /// centroid step.
    pub fn infer(&self, text: &str, index: &SimilarityIndex) -> SimilarityMatch {
        if index.is_empty() {
            return SimilarityMatch::unmatched(0.0);
        }

        let query = index.vectorize(text);
        if query.is_empty() && features(text).is_empty() {
            return SimilarityMatch::unmatched(0.0);
        }

        let best_sim = match self.vote(&query, index) {
            Some((category, best_sim)) if best_sim >= self.config.min_similarity => {
                return SimilarityMatch {
                    category: Some(category.to_string()),
                    similarity: best_sim,
                    kind: MatchKind::Neighbors,
                };
            }
            Some((_, best_sim)) => best_sim,
            None => 0.0,
        };

        let (centroid, cent_sim) = nearest_centroid(&query, index);
        if let Some(category) = centroid {
            if cent_sim >= self.config.min_centroid_similarity {
                return SimilarityMatch {
                    category: Some(category.to_string()),
                    similarity: cent_sim,
                    kind: MatchKind::Centroid,
                };
            }
        }

        SimilarityMatch::unmatched(best_sim.max(cent_sim))
    }

    /// Top-K vote. Returns the winning category and the best single
    /// neighbour similarity, or `None` when no document shares a term.
    fn vote<'a>(&self, query: &TfidfVector, index: &'a SimilarityIndex) -> Option<(&'a str, f32)> {
        let candidates = index.candidates(query);
        if candidates.is_empty() {
            return None;
        }

        let docs = index.documents();
        let mut scored: Vec<(usize, f32)> = candidates
            .iter()
            .map(|&doc| (doc, query.cosine_similarity(&docs[doc].vector)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(self.config.top_k);

        // first-ranked order, so a tie keeps the earlier category
        let mut votes: Vec<(&'a str, f32)> = Vec::new();
        for &(doc, sim) in &scored {
            let category = docs[doc].category.as_str();
            match votes.iter_mut().find(|(c, _)| *c == category) {
                Some(vote) => vote.1 += sim,
                None => votes.push((category, sim)),
            }
        }

        let best_sim = scored.first().map_or(0.0, |&(_, sim)| sim);
        let mut winner: Option<(&'a str, f32)> = None;
        for (category, total) in votes {
            if winner.map_or(true, |(_, best)| total > best) {
                winner = Some((category, total));
            }
        }

        trace!(
            candidates = candidates.len(),
            best_sim,
            winner = winner.map(|(c, _)| c),
            "similarity vote"
        );

        winner.map(|(category, _)| (category, best_sim))
    }
}

/// Category whose centroid is closest to `query`, with that similarity
fn nearest_centroid<'a>(query: &TfidfVector, index: &'a SimilarityIndex) -> (Option<&'a str>, f32) {
    let mut best: (Option<&'a str>, f32) = (None, 0.0);
    for centroid in index.centroids() {
        let sim = query.cosine_similarity(&centroid.vector);
        if best.0.is_none() || sim > best.1 {
            best = (Some(centroid.category.as_str()), sim);
        }
    }
    best
}
