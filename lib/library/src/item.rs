use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use sfxsort_core::{classifiable_text, clamp_unit, Classification, UNSORTED};

/// Folder category of files that sit directly under the library root
pub const UNCATEGORIZED_FOLDER: &str = "(Uncategorized)";

/// Where an item's effective category came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    Manual,
    Rules,
    Similarity,
}

/// One audio file in a scanned library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundItem {
    pub full_path: PathBuf,
    /// Root-relative path with `/` separators; manual overrides are keyed on it
    pub relative_key: String,
    pub file_name: String,
    /// First folder below the root
    pub folder_category: String,
    pub smart_category: String,
    pub smart_confidence: f64,
    pub manual_category: Option<String>,
    pub source: CategorySource,
    /// Stage that produced `smart_category`; `None` until one has run
    pub smart_source: Option<CategorySource>,
}

impl SoundItem {
    /// An unclassified item for `full_path` under `root`
    pub fn new(root: &Path, full_path: &Path) -> Self {
        let relative: Vec<String> = match full_path.strip_prefix(root) {
            Ok(rel) => path_segments(rel),
            Err(_) => path_segments(full_path),
        };

        let file_name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let folder_category = if relative.len() > 1 {
            relative[0].clone()
        } else {
            UNCATEGORIZED_FOLDER.to_string()
        };

        Self {
            full_path: full_path.to_path_buf(),
            relative_key: relative.join("/"),
            file_name,
            folder_category,
            smart_category: UNSORTED.to_string(),
            smart_confidence: 0.0,
            manual_category: None,
            source: CategorySource::Rules,
            smart_source: None,
        }
    }

    /// Manual category if set, else the smart category, else "Unsorted"
    pub fn effective_category(&self) -> &str {
        if let Some(manual) = self.manual() {
            return manual;
        }
        let smart = self.smart_category.trim();
        if smart.is_empty() {
            UNSORTED
        } else {
            smart
        }
    }

    /// Trimmed, non-blank manual category
    pub fn manual(&self) -> Option<&str> {
        self.manual_category
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    pub fn is_manual(&self) -> bool {
        self.manual().is_some()
    }

    pub fn is_unsorted(&self) -> bool {
        let category = self.effective_category();
        category.len() >= UNSORTED.len()
            && category.as_bytes()[..UNSORTED.len()].eq_ignore_ascii_case(UNSORTED.as_bytes())
    }

    /// Text fed to the similarity stage: root-relative folders plus stem
    pub fn classifiable_text(&self) -> String {
        classifiable_text(&self.relative_key)
    }

    pub fn set_manual(&mut self, category: impl Into<String>) {
        self.manual_category = Some(category.into());
        self.source = CategorySource::Manual;
    }

    /// Drop the manual category and fall back to the smart result. Returns
    /// `false` when no classifier stage has run for this item yet.
    pub fn clear_manual(&mut self) -> bool {
        self.manual_category = None;
        match self.smart_source {
            Some(source) => {
                self.source = source;
                true
            }
            None => false,
        }
    }

    pub fn apply_rules(&mut self, classification: &Classification) {
        self.smart_category = classification.category();
        self.smart_confidence = classification.confidence;
        self.smart_source = Some(CategorySource::Rules);
        if !self.is_manual() {
            self.source = CategorySource::Rules;
        }
    }

    pub fn apply_similarity(&mut self, category: impl Into<String>, confidence: f64) {
        self.smart_category = category.into();
        self.smart_confidence = clamp_unit(confidence);
        self.smart_source = Some(CategorySource::Similarity);
        if !self.is_manual() {
            self.source = CategorySource::Similarity;
        }
    }
}

fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
