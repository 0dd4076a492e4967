//! Operator-chosen categories keyed by root-relative path

use std::collections::HashMap;
use std::path::Path;

use ahash::AHashMap;
use sfxsort_core::{Error, Result};
use tracing::debug;

/// File name of the override map inside a library root
pub const OVERRIDES_FILE_NAME: &str = ".sonniss_overrides.json";

/// Read-only, case-insensitive map from relative key to category.
///
/// An override fully replaces both classifier stages for its item.
#[derive(Debug, Clone, Default)]
pub struct ManualOverrides {
    map: AHashMap<String, String>,
}

impl ManualOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(relative key, category)` pairs. Blank categories are
    /// ignored; a later pair replaces an earlier one with the same key.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = AHashMap::new();
        for (key, category) in pairs {
            let category = category.as_ref().trim();
            if category.is_empty() {
                continue;
            }
            map.insert(normalize_key(key.as_ref()), category.to_string());
        }
        Self { map }
    }

    /// Parse the JSON object format `{ "<relative key>": "<category>" }`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Self::from_pairs(raw))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let overrides = Self::from_json_str(&json)?;
        debug!(path = %path.display(), count = overrides.len(), "loaded manual overrides");
        Ok(overrides)
    }

    /// Load `OVERRIDES_FILE_NAME` from a library root, or nothing when absent
    pub fn load_from_root<P: AsRef<Path>>(root: P) -> Result<Self> {
        let path = root.as_ref().join(OVERRIDES_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn get(&self, relative_key: &str) -> Option<&str> {
        self.map.get(&normalize_key(relative_key)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().replace('\\', "/").to_lowercase()
}
