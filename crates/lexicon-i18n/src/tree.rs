//! Key-path trees shared by the template store and both caches
//!
//! Every position in a tree is either a [`Node::Leaf`] or a
//! [`Node::Interior`]. Walks distinguish a position that can still be filled
//! ([`Lookup::Absent`]) from one that can never hold a leaf because the path
//! runs through, or ends on, the wrong kind of node ([`Lookup::Blocked`]).

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// One position in a key-path tree.
///
/// Serializes untagged, so a JSON object becomes an interior node and any
/// other value a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node<T> {
    /// A value
    Leaf(T),
    /// Named children
    Interior(HashMap<String, Node<T>>),
}

/// Outcome of walking a tree along a path.
#[derive(Debug, PartialEq)]
pub enum Lookup<'n, T> {
    /// A leaf sits exactly at the end of the path.
    Found(&'n T),
    /// Some segment has no child yet; a leaf could be inserted here.
    Absent,
    /// A leaf was reached before the path ended, or the path ends on an
    /// interior node. No leaf can ever live at this path.
    Blocked,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::interior()
    }
}

impl<T> Node<T> {
    /// An empty interior node.
    pub fn interior() -> Self {
        Self::Interior(HashMap::new())
    }

    /// Whether this node holds a value rather than children
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Walk `path` without modifying the tree.
    pub fn lookup(&self, path: &[&str]) -> Lookup<'_, T> {
        let mut node = self;
        for segment in path {
            match node {
                Self::Leaf(_) => return Lookup::Blocked,
                Self::Interior(children) => match children.get(*segment) {
                    Some(child) => node = child,
                    None => return Lookup::Absent,
                },
            }
        }

        match node {
            Self::Leaf(value) if !path.is_empty() => Lookup::Found(value),
            _ => Lookup::Blocked,
        }
    }

    /// Place a leaf at `path`, creating interior nodes along the way.
    ///
    /// Never replaces an existing node. On a shape conflict, or when the
    /// position is already taken, the value is handed back.
    pub fn insert(&mut self, path: &[&str], value: T) -> Result<(), T> {
        self.place(path, value, false)
    }

    /// Like [`insert`](Self::insert), but an existing leaf at `path` is
    /// replaced. Interior nodes are still never converted.
    pub fn upsert(&mut self, path: &[&str], value: T) -> Result<(), T> {
        self.place(path, value, true)
    }

    fn place(&mut self, path: &[&str], value: T, overwrite: bool) -> Result<(), T> {
        let Some((last, parents)) = path.split_last() else {
            return Err(value);
        };

        let mut node = self;
        for segment in parents {
            node = match node {
                Self::Leaf(_) => return Err(value),
                Self::Interior(children) => children
                    .entry((*segment).to_string())
                    .or_insert_with(Self::interior),
            };
        }

        let Self::Interior(children) = node else {
            return Err(value);
        };
        match children.entry((*last).to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(Self::Leaf(value));
                Ok(())
            }
            Entry::Occupied(mut slot) if overwrite && slot.get().is_leaf() => {
                slot.insert(Self::Leaf(value));
                Ok(())
            }
            Entry::Occupied(_) => Err(value),
        }
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Interior(children) => children.values().map(Self::leaf_count).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node<&'static str> {
        let mut root = Node::interior();
        root.insert(&["menu", "open"], "Open").unwrap();
        root.insert(&["menu", "close"], "Close").unwrap();
        root.insert(&["title"], "Editor").unwrap();
        root
    }

    #[test]
    fn test_lookup_found() {
        let root = sample();
        assert_eq!(root.lookup(&["menu", "open"]), Lookup::Found(&"Open"));
        assert_eq!(root.lookup(&["title"]), Lookup::Found(&"Editor"));
    }

    #[test]
    fn test_lookup_absent_and_blocked() {
        let root = sample();
        assert_eq!(root.lookup(&["menu", "save"]), Lookup::Absent);
        assert_eq!(root.lookup(&["help", "about"]), Lookup::Absent);
        // descending through a leaf
        assert_eq!(root.lookup(&["title", "short"]), Lookup::Blocked);
        // ending on a group
        assert_eq!(root.lookup(&["menu"]), Lookup::Blocked);
        assert_eq!(root.lookup(&[]), Lookup::Blocked);
    }

    #[test]
    fn test_insert_never_converts_shape() {
        let mut root = sample();
        assert_eq!(root.insert(&["title", "short"], "Ed"), Err("Ed"));
        assert_eq!(root.insert(&["menu"], "Menu"), Err("Menu"));
        assert_eq!(root.upsert(&["menu"], "Menu"), Err("Menu"));
        assert_eq!(root.leaf_count(), 3);
    }

    #[test]
    fn test_insert_keeps_existing_leaf() {
        let mut root = sample();
        assert_eq!(root.insert(&["title"], "Other"), Err("Other"));
        assert_eq!(root.lookup(&["title"]), Lookup::Found(&"Editor"));

        root.upsert(&["title"], "Other").unwrap();
        assert_eq!(root.lookup(&["title"]), Lookup::Found(&"Other"));
    }

    #[test]
    fn test_untagged_deserialization() {
        let root: Node<String> =
            serde_json::from_str(r#"{"a": {"b": "leaf"}, "c": "top"}"#).unwrap();
        assert_eq!(root.lookup(&["a", "b"]), Lookup::Found(&"leaf".to_string()));
        assert_eq!(root.leaf_count(), 2);
    }
}
