//! Recursive `{keys, children}` snapshots of a tree's shape.
//!
//! Loading performs no validation. A malformed snapshot yields a tree whose
//! queries are meaningless; call [`BTree::verify`] when that matters.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::btree_base::{
    btree::BTree,
    btree_traits::{BTreeParams, KeyComparator},
    error::Result,
    node::Node,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de>"))]
pub struct Snapshot<K> {
    pub keys: Vec<K>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Snapshot<K>>,
}

impl<K> Snapshot<K> {
    pub fn leaf(keys: Vec<K>) -> Self {
        Self {
            keys,
            children: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self>
    where
        K: DeserializeOwned,
    {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String>
    where
        K: Serialize,
    {
        Ok(serde_json::to_string(self)?)
    }
}

impl<K> From<Snapshot<K>> for Node<K> {
    fn from(snapshot: Snapshot<K>) -> Self {
        Node::new(
            snapshot.keys,
            snapshot.children.into_iter().map(Node::from).collect(),
        )
    }
}

impl<K: Clone> From<&Node<K>> for Snapshot<K> {
    fn from(node: &Node<K>) -> Self {
        Snapshot {
            keys: node.keys().to_vec(),
            children: node.children().iter().map(Snapshot::from).collect(),
        }
    }
}

impl<K, C: KeyComparator<K>> BTree<K, C> {
    pub fn from_snapshot(params: BTreeParams, key_cmp: C, snapshot: Snapshot<K>) -> Self {
        Self::from_root(params, key_cmp, Node::from(snapshot))
    }

    pub fn from_json(params: BTreeParams, key_cmp: C, json: &str) -> Result<Self>
    where
        K: DeserializeOwned,
    {
        Ok(Self::from_snapshot(params, key_cmp, Snapshot::from_json(json)?))
    }
}

impl<K: Clone, C> BTree<K, C> {
    pub fn snapshot(&self) -> Snapshot<K> {
        Snapshot::from(self.root())
    }

    pub fn to_json(&self) -> Result<String>
    where
        K: Serialize,
    {
        self.snapshot().to_json()
    }
}
