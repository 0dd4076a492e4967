//! # sfxsort
//!
//! Sorts a sound-effects library into categories from nothing but its file
//! and folder names.
//!
//! Classification runs in two passes. A table of vendor naming conventions
//! (prefix codes such as `AMBUrbn` or `GUNRif`, anchored patterns, phrases
//! and keywords) labels what it can. The confidently labelled files then
//! train a TF-IDF index, and whatever the rules left unsorted is placed by
//! a nearest-neighbour vote with a per-category centroid fallback.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! sfxsort scan /media/sfx --tree
//! sfxsort infer "Ambience/AMBUrbn_NightTraffic_01.wav"
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use sfxsort::prelude::*;
//! use std::path::Path;
//! use std::sync::atomic::AtomicBool;
//!
//! let rules = RuleBasedClassifier::new();
//! let c = rules.infer("AMBUrbn_NightTraffic_01.wav");
//! assert_eq!(c.category(), "Ambient/Ambience/Urban");
//!
//! let root = Path::new("/media/sfx");
//! let classifier = LibraryClassifier::new(PipelineConfig::default()).unwrap();
//! let items = classifier
//!     .scan(root, &ManualOverrides::new(), &AtomicBool::new(false), |_| {})
//!     .unwrap();
//! let library = Library::new(items);
//! println!("{} unsorted", library.filter("Unsorted").len());
//! ```
//!
//! ## Crate Structure
//!
//! - [`sfxsort-core`](https://docs.rs/sfxsort-core) - Tokenizer, rule tables, rule classifier, TF-IDF index
//! - [`sfxsort-similarity`](https://docs.rs/sfxsort-similarity) - kNN vote and centroid fallback
//! - [`sfxsort-library`](https://docs.rs/sfxsort-library) - Discovery, overrides, scan pipeline, category tree

// Re-export core types
pub use sfxsort_core::{
    Classification, RuleBasedClassifier, SimilarityIndex, TfidfVector,
    Error, Result,
};

// Re-export similarity stage
pub use sfxsort_similarity::{MatchKind, SimilarityClassifier, SimilarityConfig, SimilarityMatch};

// Re-export library scan driver
pub use sfxsort_library::{
    discover_audio_files, CategorySource, CategoryTree, Library, LibraryClassifier,
    ManualOverrides, PipelineConfig, ScanPhase, ScanProgress, SoundItem,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Classification, RuleBasedClassifier, SimilarityIndex,
        SimilarityClassifier, SimilarityConfig,
        LibraryClassifier, PipelineConfig, ManualOverrides, Library, SoundItem,
        CategoryTree, CategorySource,
        Error, Result,
    };
}

/// Filename tokenizer used by both passes
pub mod text {
    pub use sfxsort_core::text::{
        classifiable_text, features, normalize, tokenize_char_ngrams, tokenize_words, PathParts,
    };
}
