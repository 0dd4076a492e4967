use serde::{Deserialize, Serialize};

/// Term identifier inside a [`crate::SimilarityIndex`] vocabulary
pub type TermId = u32;

/// Floor applied to every stored norm
pub const NORM_EPSILON: f32 = 1e-6;

/// Sparse TF-IDF weights with a precomputed L2 norm.
///
/// Entries are kept sorted by term id, which makes lookups a binary search
/// and keeps every dot product summed in the same order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TfidfVector {
    weights: Vec<(TermId, f32)>,
    norm: f32,
}

impl TfidfVector {
    /// Build from (term, weight) pairs. Duplicate terms are summed.
    #[must_use]
    pub fn new(mut weights: Vec<(TermId, f32)>) -> Self {
        weights.sort_unstable_by_key(|&(term, _)| term);
        weights.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 += next.1;
                true
            } else {
                false
            }
        });

        let norm = l2_norm(&weights);
        Self { weights, norm }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Stored L2 norm, never below `NORM_EPSILON`
    #[inline]
    #[must_use]
    pub fn norm(&self) -> f32 {
        self.norm
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (TermId, f32)> + '_ {
        self.weights.iter().copied()
    }

    pub fn terms(&self) -> impl Iterator<Item = TermId> + '_ {
        self.weights.iter().map(|&(term, _)| term)
    }

    pub fn get(&self, term: TermId) -> Option<f32> {
        self.weights
            .binary_search_by_key(&term, |&(t, _)| t)
            .ok()
            .map(|idx| self.weights[idx].1)
    }

    /// Dot product, walking the smaller vector and probing the larger one.
    pub fn dot(&self, other: &TfidfVector) -> f32 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };

        small
            .iter()
            .filter_map(|(term, w)| large.get(term).map(|w2| w * w2))
            .sum()
    }

    /// Cosine similarity using the stored norms, clamped to [0, 1]
    #[inline]
    pub fn cosine_similarity(&self, other: &TfidfVector) -> f32 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let sim = self.dot(other) / (self.norm * other.norm);
        if sim.is_nan() {
            0.0
        } else {
            sim.clamp(0.0, 1.0)
        }
    }

    /// Unit-length copy (within the epsilon floor)
    #[must_use]
    pub fn normalized(&self) -> Self {
        let inv = 1.0 / self.norm;
        let weights: Vec<(TermId, f32)> = self.weights.iter().map(|&(t, w)| (t, w * inv)).collect();
        let norm = l2_norm(&weights);
        Self { weights, norm }
    }
}

fn l2_norm(weights: &[(TermId, f32)]) -> f32 {
    let sum_sq: f32 = weights.iter().map(|&(_, w)| w * w).sum();
    sum_sq.sqrt().max(NORM_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let v1 = TfidfVector::new(vec![(1, 1.0), (2, 1.0)]);
        let v2 = TfidfVector::new(vec![(2, 1.0), (1, 1.0)]);
        assert!((v1.cosine_similarity(&v2) - 1.0).abs() < 1e-6);

        let v3 = TfidfVector::new(vec![(1, 1.0)]);
        let v4 = TfidfVector::new(vec![(7, 1.0)]);
        assert!(v3.cosine_similarity(&v4).abs() < 1e-6);
    }

    #[test]
    fn test_dot_uses_smaller_side() {
        let small = TfidfVector::new(vec![(3, 2.0)]);
        let large = TfidfVector::new(vec![(1, 1.0), (3, 4.0), (9, 5.0)]);
        assert_eq!(small.dot(&large), 8.0);
        assert_eq!(large.dot(&small), 8.0);
    }

    #[test]
    fn test_norm_floor() {
        let empty = TfidfVector::new(Vec::new());
        assert_eq!(empty.norm(), NORM_EPSILON);
        assert_eq!(empty.cosine_similarity(&empty), 0.0);

        let tiny = TfidfVector::new(vec![(0, 0.0)]);
        assert!(tiny.norm() >= NORM_EPSILON);
    }

    #[test]
    fn test_duplicates_are_merged() {
        let v = TfidfVector::new(vec![(5, 1.0), (2, 1.0), (5, 2.0)]);
        assert_eq!(v.len(), 2);
        assert_eq!(v.get(5), Some(3.0));
        assert_eq!(v.terms().collect::<Vec<_>>(), vec![2, 5]);
    }

    #[test]
    fn test_normalized() {
        let v = TfidfVector::new(vec![(0, 3.0), (1, 4.0)]);
        let n = v.normalized();
        assert!((n.norm() - 1.0).abs() < 1e-6);
        assert!((n.get(0).unwrap() - 0.6).abs() < 1e-6);
    }
}
