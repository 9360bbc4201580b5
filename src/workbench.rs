//! Batch commands over a single owned tree of user-typed [`Key`]s.

use std::fmt;

use crate::btree_base::{
    btree_traits::BTreeParams,
    error::{BTreeError, Result},
    DefaultBTree, DefaultKeyComparator,
};
use crate::key::Key;

pub const EMPTY_TEMPLATE: &str = r#"{"keys":[]}"#;

/// A complete order-3 tree over 1..=16.
pub const SAMPLE_TEMPLATE: &str = r#"{
    "keys": [8],
    "children": [{
        "keys": [4],
        "children": [{
            "keys": [2],
            "children": [{"keys": [1]}, {"keys": [3]}]
        }, {
            "keys": [6],
            "children": [{"keys": [5]}, {"keys": [7]}]
        }]
    }, {
        "keys": [12],
        "children": [{
            "keys": [10],
            "children": [{"keys": [9]}, {"keys": [11]}]
        }, {
            "keys": [14],
            "children": [{"keys": [13]}, {"keys": [15, 16]}]
        }]
    }]
}"#;

/// What happened to one key of a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyOutcome {
    Found(Key),
    Missing(Key),
    Inserted(Key),
    Duplicate(Key),
    Removed(Key),
    Absent(Key),
}

impl KeyOutcome {
    pub fn key(&self) -> &Key {
        match self {
            KeyOutcome::Found(k)
            | KeyOutcome::Missing(k)
            | KeyOutcome::Inserted(k)
            | KeyOutcome::Duplicate(k)
            | KeyOutcome::Removed(k)
            | KeyOutcome::Absent(k) => k,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            KeyOutcome::Found(_) | KeyOutcome::Inserted(_) | KeyOutcome::Removed(_)
        )
    }
}

impl fmt::Display for KeyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOutcome::Found(k) => write!(f, "key {} is in the tree", k),
            KeyOutcome::Missing(k) => write!(f, "key {} is not in the tree", k),
            KeyOutcome::Inserted(k) => write!(f, "inserted key {}", k),
            KeyOutcome::Duplicate(k) => write!(f, "key {} is a duplicate", k),
            KeyOutcome::Removed(k) => write!(f, "removed key {}", k),
            KeyOutcome::Absent(k) => write!(f, "key {} does not exist", k),
        }
    }
}

pub struct Workbench {
    tree: DefaultBTree<Key>,
}

impl Workbench {
    pub fn empty(order: usize) -> Result<Self> {
        Self::from_template(order, EMPTY_TEMPLATE)
    }

    /// Load [`SAMPLE_TEMPLATE`]. Its one-key nodes only satisfy orders 3
    /// and 4; larger orders fail with [`BTreeError::Invariant`].
    pub fn sample(order: usize) -> Result<Self> {
        Self::from_template(order, SAMPLE_TEMPLATE)
    }

    /// Load a snapshot and reject it unless it is a valid tree of `order`.
    pub fn from_template(order: usize, json: &str) -> Result<Self> {
        let params = BTreeParams::new(order)?;
        let tree = DefaultBTree::from_json(params, DefaultKeyComparator::new(), json)?;
        tree.verify()?;
        log::debug!("Workbench::from_template: order {} size {}", order, tree.len());
        Ok(Self { tree })
    }

    pub fn tree(&self) -> &DefaultBTree<Key> {
        &self.tree
    }

    pub fn into_tree(self) -> DefaultBTree<Key> {
        self.tree
    }

    pub fn search_keys(&self, tokens: &str) -> Result<Vec<KeyOutcome>> {
        Ok(Key::parse_list(tokens)?
            .into_iter()
            .map(|key| {
                if self.tree.search(&key) {
                    KeyOutcome::Found(key)
                } else {
                    KeyOutcome::Missing(key)
                }
            })
            .collect())
    }

    pub fn insert_keys(&mut self, tokens: &str) -> Result<Vec<KeyOutcome>> {
        Ok(Key::parse_list(tokens)?
            .into_iter()
            .map(|key| {
                if self.tree.insert(key.clone()) {
                    KeyOutcome::Inserted(key)
                } else {
                    KeyOutcome::Duplicate(key)
                }
            })
            .collect())
    }

    pub fn remove_keys(&mut self, tokens: &str) -> Result<Vec<KeyOutcome>> {
        let mut outcomes = Vec::new();
        for key in Key::parse_list(tokens)? {
            if self.tree.remove(&key)? {
                outcomes.push(KeyOutcome::Removed(key));
            } else {
                outcomes.push(KeyOutcome::Absent(key));
            }
        }
        Ok(outcomes)
    }

    pub fn to_json(&self) -> Result<String> {
        self.tree.to_json()
    }

    pub fn to_dot(&self) -> String {
        self.tree.to_dot()
    }

    pub fn traverse_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.tree.traverse())?)
    }
}

/// Comma separated integers from `start` to `end` inclusive, counting down
/// when `end < start`. Zero bounds are rejected.
pub fn generate_keys(start: i64, end: i64) -> Result<String> {
    if start == 0 || end == 0 {
        return Err(BTreeError::InvalidRange { start, end });
    }
    let keys: Vec<String> = if end > start {
        (start..=end).map(|k| k.to_string()).collect()
    } else {
        (end..=start).rev().map(|k| k.to_string()).collect()
    };
    Ok(keys.join(","))
}
