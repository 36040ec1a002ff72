//! Raw template strings for one package and locale

use crate::error::{I18nError, I18nResult};
use crate::key::KeyPath;
use crate::tree::{Lookup, Node};
use parking_lot::RwLock;
use std::sync::Arc;

/// A shared handle to a tree of raw template strings.
///
/// Clones share the same tree. The resolution engine only ever reads from
/// it; callers that load translations incrementally keep a clone and
/// [`insert`](Self::insert) into it, and the new strings become visible to
/// the next lookup.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    root: Arc<RwLock<Node<String>>>,
}

impl TemplateStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing tree. A bare string root is treated as empty.
    pub fn from_tree(tree: Node<String>) -> Self {
        let root = match tree {
            Node::Interior(_) => tree,
            Node::Leaf(_) => Node::interior(),
        };
        Self {
            root: Arc::new(RwLock::new(root)),
        }
    }

    /// Build a store from `(dotted key, template)` pairs.
    pub fn from_entries<I, K, V>(entries: I) -> I18nResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let store = Self::new();
        for (key, template) in entries {
            store.insert(key.as_ref(), template)?;
        }
        Ok(store)
    }

    /// Add or replace the template at `key`.
    ///
    /// Paths that were already compiled keep their cached formatter; only
    /// keys not yet resolved pick up the new string.
    pub fn insert(&self, key: &str, template: impl Into<String>) -> I18nResult<()> {
        let path = KeyPath::parse(key)?;
        self.root
            .write()
            .upsert(path.segments(), template.into())
            .map_err(|_| I18nError::ShapeConflict {
                key: key.to_string(),
            })
    }

    /// Raw template at `path`, if one exists.
    pub fn get(&self, path: &KeyPath<'_>) -> Option<String> {
        match self.root.read().lookup(path.segments()) {
            Lookup::Found(template) => Some(template.clone()),
            Lookup::Absent | Lookup::Blocked => None,
        }
    }

    /// Number of templates in the store
    pub fn len(&self) -> usize {
        self.root.read().leaf_count()
    }

    /// Whether the store holds no templates
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Node<String>> for TemplateStore {
    fn from(tree: Node<String>) -> Self {
        Self::from_tree(tree)
    }
}
