//! # sfxsort Similarity
//!
//! Query phase of the similarity stage: items the naming rules could not
//! place are matched against a [`SimilarityIndex`] built from the items
//! they could.
//!
//! ## Example
//!
//! ```rust
//! use sfxsort_core::SimilarityIndex;
//! use sfxsort_similarity::{SimilarityClassifier, SimilarityConfig};
//!
//! let index = SimilarityIndex::build(vec![
//!     ("gunshot pistol indoor", "Weapons/Guns"),
//!     ("gunshot rifle outdoor", "Weapons/Guns"),
//!     ("rain roof heavy", "Weather/Rain"),
//! ]);
//!
//! let classifier = SimilarityClassifier::new(SimilarityConfig::default());
//! let (category, similarity) = classifier.infer("gunshot pistol outdoor", &index).into_pair();
//! assert_eq!(category.as_deref(), Some("Weapons/Guns"));
//! assert!(similarity > 0.18);
//! ```
//!
//! ## Query flow
//!
//! ```text
//! text ──> query vector ──> candidates (postings) ──> top-K vote
//!                                                        │ best < min_similarity
//!                                                        v
//!                                               nearest centroid
//! ```
//!
//! [`SimilarityIndex`]: sfxsort_core::SimilarityIndex

pub mod classifier;
pub mod config;

pub use classifier::{MatchKind, SimilarityClassifier, SimilarityMatch};
pub use config::{
    SimilarityConfig, DEFAULT_MIN_CENTROID_SIMILARITY, DEFAULT_MIN_SIMILARITY, DEFAULT_TOP_K,
};
