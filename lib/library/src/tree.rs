//! Category hierarchy with item counts, for browsing and override choices

use serde::Serialize;
use sfxsort_core::UNSORTED;

/// Key and name of the tree root
pub const ROOT_KEY: &str = "(All)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    /// `/`-joined path from the root, e.g. "Weapons/Guns"
    pub key: String,
    pub name: String,
    /// Items at or below this node
    pub count: usize,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    fn new(key: String, name: String) -> Self {
        Self {
            key,
            name,
            count: 0,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTree {
    root: CategoryNode,
}

impl CategoryTree {
    /// Group effective category strings into a tree. Blank strings count as
    /// "Unsorted"; the first spelling seen of a node is kept.
    pub fn build<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = CategoryNode::new(ROOT_KEY.to_string(), ROOT_KEY.to_string());

        for category in categories {
            root.count += 1;
            let mut node = &mut root;

            for part in category_parts(category.as_ref()) {
                let pos = match node.children.iter().position(|c| same_key(&c.name, part)) {
                    Some(pos) => pos,
                    None => {
                        let key = match node.key.as_str() {
                            ROOT_KEY => part.to_string(),
                            parent => format!("{}/{}", parent, part),
                        };
                        node.children.push(CategoryNode::new(key, part.to_string()));
                        node.children.len() - 1
                    }
                };
                node = &mut node.children[pos];
                node.count += 1;
            }
        }

        Self { root }
    }

    pub fn root(&self) -> &CategoryNode {
        &self.root
    }

    /// Every node with its depth, parents before children
    pub fn flatten(&self) -> Vec<(usize, &CategoryNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, &self.root)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            for child in node.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }

    /// Distinct node keys below the root, sorted case-insensitively
    pub fn options(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .flatten()
            .into_iter()
            .skip(1)
            .map(|(_, node)| node.key.clone())
            .collect();
        keys.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        keys.dedup();
        keys
    }

    /// Node by key, ignoring case
    pub fn find(&self, key: &str) -> Option<&CategoryNode> {
        let key = key.trim();
        self.flatten()
            .into_iter()
            .map(|(_, node)| node)
            .find(|node| same_key(&node.key, key))
    }
}

/// Trimmed, non-empty `/` segments of a category; "Unsorted" when blank
pub fn category_parts(category: &str) -> Vec<&str> {
    let parts: Vec<&str> = category
        .split('/')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        vec![UNSORTED]
    } else {
        parts
    }
}

pub(crate) fn same_key(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
