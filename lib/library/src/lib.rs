//! # sfxsort Library
//!
//! Scan driver for a sound-effects library on disk:
//!
//! - [`discover_audio_files`] - Walk a root and collect audio files
//! - [`ManualOverrides`] - Operator-chosen categories that bypass inference
//! - [`LibraryClassifier`] - Rule pass, corpus gate, index build, similarity pass
//! - [`CategoryTree`] - Category hierarchy with counts
//! - [`Library`] - Thread-safe handle to the classified items
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::atomic::AtomicBool;
//! use sfxsort_library::{Library, LibraryClassifier, ManualOverrides, PipelineConfig};
//!
//! let root = Path::new("/media/sfx");
//! let classifier = LibraryClassifier::new(PipelineConfig::default()).unwrap();
//! let overrides = ManualOverrides::load_from_root(root).unwrap();
//! let cancel = AtomicBool::new(false);
//!
//! let items = classifier.scan(root, &overrides, &cancel, |p| {
//!     println!("{:?} {}/{}", p.phase, p.done, p.total);
//! }).unwrap();
//!
//! let library = Library::new(items);
//! for item in library.filter("Weapons") {
//!     println!("{}", item.relative_key);
//! }
//! ```

pub mod config;
pub mod item;
pub mod library;
pub mod overrides;
pub mod pipeline;
pub mod scan;
pub mod tree;

pub use config::PipelineConfig;
pub use item::{CategorySource, SoundItem, UNCATEGORIZED_FOLDER};
pub use library::Library;
pub use overrides::{ManualOverrides, OVERRIDES_FILE_NAME};
pub use pipeline::{LibraryClassifier, ScanPhase, ScanProgress};
pub use scan::{discover_audio_files, is_audio_file, AUDIO_EXTENSIONS};
pub use tree::{CategoryNode, CategoryTree, ROOT_KEY};
