//! # sfxsort Core
//!
//! Core library for sfxsort, the sound-effects filename classifier.
//!
//! This crate provides the building blocks shared by every other crate:
//!
//! - [`text`] - Filename normalization, word tokens and character n-grams
//! - [`RuleBasedClassifier`] - Prefix, vendor, phrase and token rules
//! - [`SimilarityIndex`] - Frozen TF-IDF index with per-category centroids
//! - [`TfidfVector`] - Sparse vector with a precomputed norm
//!
//! ## Example
//!
//! ```rust
//! use sfxsort_core::{RuleBasedClassifier, SimilarityIndex};
//!
//! let rules = RuleBasedClassifier::new();
//! let c = rules.infer("/lib/Ambience/AMBUrbn_NightTraffic_01.wav");
//! assert_eq!(c.category(), "Ambient/Ambience/Urban");
//!
//! let index = SimilarityIndex::build(vec![
//!     ("gunshot pistol close", "Weapons/Guns"),
//!     ("rain on roof", "Weather/Rain"),
//! ]);
//! assert_eq!(index.len(), 2);
//! ```

pub mod category;
pub mod classifier;
pub mod error;
pub mod index;
pub mod rules;
pub mod text;
pub mod vector;

pub use category::{clamp_unit, effective_category, Classification, GENERAL, UNSORTED};
pub use classifier::{RuleBasedClassifier, ScoreBoard};
pub use error::{Error, Result};
pub use index::{Centroid, IndexedDocument, SimilarityIndex};
pub use rules::{RuleSet, Tiers};
pub use text::{classifiable_text, features, normalize, tokenize_char_ngrams, tokenize_words, PathParts};
pub use vector::{TermId, TfidfVector};
