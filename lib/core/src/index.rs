// TF-IDF similarity index over already-labelled items
use std::collections::BTreeMap;

use ahash::AHashMap;
use tracing::debug;

use crate::text::features;
use crate::vector::{TermId, TfidfVector};

/// A labelled training document
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub vector: TfidfVector,
    pub category: String,
}

/// Mean vector of every document in one category, L2-normalized
#[derive(Debug, Clone)]
pub struct Centroid {
    pub category: String,
    pub vector: TfidfVector,
}

/// Immutable snapshot built once per scan.
///
/// There is no way to add or remove documents after [`SimilarityIndex::build`];
/// a new scan builds a new index. Being immutable it is `Send + Sync` and
/// can be queried from many threads without locking.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    vocab: AHashMap<String, TermId>,
    idf: Vec<f32>,
    docs: Vec<IndexedDocument>,
    // term -> ids of documents whose vector contains it
    postings: Vec<Vec<u32>>,
    // sorted by category
    centroids: Vec<Centroid>,
}

impl SimilarityIndex {
    /// Build from `(text, category)` pairs.
    ///
    /// Documents whose text yields no features are dropped. An empty result
    /// is a valid index that matches nothing.
    pub fn build<I, T, C>(corpus: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: Into<String>,
    {
        let mut vocab: AHashMap<String, TermId> = AHashMap::new();
        let mut df: Vec<u32> = Vec::new();
        // doc index + 1 of the last document that counted towards df
        let mut last_seen: Vec<usize> = Vec::new();
        let mut tokenized: Vec<(Vec<TermId>, String)> = Vec::new();
        let mut skipped = 0usize;

        for (text, category) in corpus {
            let feats = features(text.as_ref());
            if feats.is_empty() {
                skipped += 1;
                continue;
            }

            let stamp = tokenized.len() + 1;
            let ids: Vec<TermId> = feats
                .into_iter()
                .map(|feat| {
                    let id = *vocab.entry(feat).or_insert_with(|| {
                        df.push(0);
                        last_seen.push(0);
                        (df.len() - 1) as TermId
                    });
                    let slot = id as usize;
                    if last_seen[slot] != stamp {
                        last_seen[slot] = stamp;
                        df[slot] += 1;
                    }
                    id
                })
                .collect();

            tokenized.push((ids, category.into()));
        }

        if tokenized.is_empty() {
            debug!(skipped, "similarity index built with no usable documents");
            return Self::default();
        }

        let n = tokenized.len() as f64;
        let idf: Vec<f32> = df
            .iter()
            .map(|&d| (((n + 1.0) / (f64::from(d) + 1.0)).ln() + 1.0) as f32)
            .collect();

        let mut postings: Vec<Vec<u32>> = vec![Vec::new(); idf.len()];
        let mut sums: BTreeMap<String, (AHashMap<TermId, f32>, usize)> = BTreeMap::new();
        let mut docs = Vec::with_capacity(tokenized.len());

        for (doc_idx, (mut ids, category)) in tokenized.into_iter().enumerate() {
            let vector = weigh(&mut ids, &idf);
            for term in vector.terms() {
                postings[term as usize].push(doc_idx as u32);
            }

            let (sum, count) = sums.entry(category.clone()).or_default();
            for (term, w) in vector.iter() {
                *sum.entry(term).or_insert(0.0) += w;
            }
            *count += 1;

            docs.push(IndexedDocument { vector, category });
        }

        let centroids: Vec<Centroid> = sums
            .into_iter()
            .map(|(category, (sum, count))| {
                let inv = 1.0 / count as f32;
                let mean = sum.into_iter().map(|(t, w)| (t, w * inv)).collect();
                Centroid {
                    category,
                    vector: TfidfVector::new(mean).normalized(),
                }
            })
            .collect();

        debug!(
            documents = docs.len(),
            skipped,
            vocabulary = vocab.len(),
            categories = centroids.len(),
            "built similarity index"
        );

        Self {
            vocab,
            idf,
            docs,
            postings,
            centroids,
        }
    }

    /// Number of indexed documents
    #[inline]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocab.len()
    }

    /// Smoothed IDF of a feature seen at build time
    pub fn idf(&self, token: &str) -> Option<f32> {
        self.vocab.get(token).map(|&id| self.idf[id as usize])
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.docs
    }

    pub fn document(&self, idx: usize) -> Option<&IndexedDocument> {
        self.docs.get(idx)
    }

    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    /// Ids of documents containing `token`
    pub fn postings(&self, token: &str) -> &[u32] {
        self.vocab
            .get(token)
            .map(|&id| self.postings[id as usize].as_slice())
            .unwrap_or(&[])
    }

    /// Vectorize query text with the stored IDF; features never seen at
    /// build time are dropped.
    pub fn vectorize(&self, text: &str) -> TfidfVector {
        let mut ids: Vec<TermId> = features(text)
            .iter()
            .filter_map(|feat| self.vocab.get(feat.as_str()).copied())
            .collect();
        weigh(&mut ids, &self.idf)
    }

    /// Deduplicated, ascending ids of every document sharing a term with `query`
    pub fn candidates(&self, query: &TfidfVector) -> Vec<usize> {
        let mut ids: Vec<usize> = query
            .terms()
            .filter_map(|term| self.postings.get(term as usize))
            .flatten()
            .map(|&doc| doc as usize)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Sublinear TF times IDF for a bag of term ids
fn weigh(ids: &mut [TermId], idf: &[f32]) -> TfidfVector {
    ids.sort_unstable();
    let weights = ids
        .chunk_by(|a, b| a == b)
        .map(|run| {
            let term = run[0];
            let tf = run.len() as f32;
            (term, (1.0 + tf.ln()) * idf[term as usize])
        })
        .collect();
    TfidfVector::new(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::NORM_EPSILON;

    fn corpus() -> Vec<(&'static str, &'static str)> {
        vec![
            ("weapons gunshot pistol", "Weapons/Guns"),
            ("weapons gunshot rifle", "Weapons/Guns"),
            ("rain heavy roof", "Weather/Rain"),
            ("rain light window", "Weather/Rain"),
        ]
    }

    #[test]
    fn test_empty_corpus() {
        let index = SimilarityIndex::build(Vec::<(String, String)>::new());
        assert!(index.is_empty());
        assert!(index.centroids().is_empty());
        assert_eq!(index.vocabulary_len(), 0);
        assert!(index.vectorize("gunshot").is_empty());
    }

    #[test]
    fn test_documents_without_features_are_dropped() {
        let index = SimilarityIndex::build(vec![("", "A"), ("a", "A"), ("rain roof", "B")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.documents()[0].category, "B");
    }

    #[test]
    fn test_smoothed_idf() {
        let index = SimilarityIndex::build(corpus());
        // "gunshot" is in 2 of 4 documents
        let expected = ((5.0f64 / 3.0).ln() + 1.0) as f32;
        assert!((index.idf("gunshot").unwrap() - expected).abs() < 1e-6);
        // "roof" in 1 of 4
        let rare = ((5.0f64 / 2.0).ln() + 1.0) as f32;
        assert!((index.idf("roof").unwrap() - rare).abs() < 1e-6);
        assert!(index.idf("nothing").is_none());
    }

    #[test]
    fn test_postings() {
        let index = SimilarityIndex::build(corpus());
        assert_eq!(index.postings("gunshot"), &[0, 1]);
        assert_eq!(index.postings("rain"), &[2, 3]);
        assert!(index.postings("thunder").is_empty());
    }

    #[test]
    fn test_vectors_have_floored_norm() {
        let index = SimilarityIndex::build(corpus());
        for doc in index.documents() {
            assert!(doc.vector.norm() >= NORM_EPSILON);
        }
        for centroid in index.centroids() {
            assert!((centroid.vector.norm() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_centroids_sorted_by_category() {
        let index = SimilarityIndex::build(corpus());
        let cats: Vec<&str> = index.centroids().iter().map(|c| c.category.as_str()).collect();
        assert_eq!(cats, vec!["Weapons/Guns", "Weather/Rain"]);
    }

    #[test]
    fn test_identical_text_has_unit_cosine() {
        let index = SimilarityIndex::build(corpus());
        let query = index.vectorize("weapons gunshot rifle");
        let sim = query.cosine_similarity(&index.documents()[1].vector);
        assert!((sim - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_candidates_are_deduplicated() {
        let index = SimilarityIndex::build(corpus());
        let query = index.vectorize("gunshot rain");
        assert_eq!(index.candidates(&query), vec![0, 1, 2, 3]);

        let none = index.vectorize("zzzz qqqq");
        assert!(index.candidates(&none).is_empty());
    }

    #[test]
    fn test_sublinear_tf() {
        let index = SimilarityIndex::build(vec![("rain rain", "A"), ("roof", "B")]);
        let idf = index.idf("rain").unwrap();
        let term = index.vocab["rain"];
        let w = index.documents()[0].vector.get(term).unwrap();
        assert!((w - (1.0 + 2.0f32.ln()) * idf).abs() < 1e-6);
    }
}
