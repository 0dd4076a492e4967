use std::sync::Arc;

use parking_lot::RwLock;
use sfxsort_core::RuleBasedClassifier;
use tracing::debug;

use crate::item::SoundItem;
use crate::tree::{category_parts, same_key, CategoryTree, ROOT_KEY};

/// Shared handle to the items of one scanned library.
///
/// Cloning is cheap and every clone sees the same items. Readers (filters,
/// tree building) run concurrently; setting a manual category takes the
/// write lock briefly.
#[derive(Debug, Clone, Default)]
pub struct Library {
    items: Arc<RwLock<Vec<SoundItem>>>,
}

impl Library {
    pub fn new(items: Vec<SoundItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Swap in the result of a new scan
    pub fn replace(&self, items: Vec<SoundItem>) {
        *self.items.write() = items;
    }

    /// Snapshot of every item
    pub fn items(&self) -> Vec<SoundItem> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn get(&self, relative_key: &str) -> Option<SoundItem> {
        self.items
            .read()
            .iter()
            .find(|item| same_key(&item.relative_key, relative_key))
            .cloned()
    }

    /// Set, or clear with `None` or a blank string, an item's manual
    /// category. Returns `false` when no item has that key.
    ///
    /// Clearing restores the item's last smart result, from the rules or
    /// the similarity pass. An item no stage has classified yet goes
    /// through the rules on the spot.
    pub fn set_manual(&self, relative_key: &str, category: Option<&str>) -> bool {
        let mut items = self.items.write();
        let Some(item) = items
            .iter_mut()
            .find(|item| same_key(&item.relative_key, relative_key))
        else {
            return false;
        };

        match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => item.set_manual(category),
            None => {
                if !item.clear_manual() {
                    let classification =
                        RuleBasedClassifier::new().infer(&item.full_path.to_string_lossy());
                    item.apply_rules(&classification);
                }
            }
        }
        debug!(key = %item.relative_key, category = item.effective_category(), "manual category updated");
        true
    }

    /// Items whose effective category is `category_key` or lies beneath it.
    /// `"(All)"` and a blank key match everything.
    pub fn filter(&self, category_key: &str) -> Vec<SoundItem> {
        let key = category_key.trim();
        let items = self.items.read();
        if key.is_empty() || same_key(key, ROOT_KEY) {
            return items.clone();
        }

        let wanted = category_parts(key);
        items
            .iter()
            .filter(|item| {
                let parts = category_parts(item.effective_category());
                parts.len() >= wanted.len()
                    && parts.iter().zip(&wanted).all(|(a, b)| same_key(a, b))
            })
            .cloned()
            .collect()
    }

    pub fn tree(&self) -> CategoryTree {
        let items = self.items.read();
        CategoryTree::build(items.iter().map(SoundItem::effective_category))
    }
}
