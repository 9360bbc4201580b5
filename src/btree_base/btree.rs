use std::fmt::Debug;

use super::{
    btree_traits::{BTreeParams, KeyComparator},
    deletion::InsertionFlags,
    error::{BTreeError, Result},
    iter::Iter,
    node::{Node, NodeCtx},
    tree_stats::TreeStats,
    DefaultKeyComparator,
};

/// An order-M B-tree over keys ordered by `C`.
///
/// The root is always present; an empty tree is a keyless leaf root.
pub struct BTree<K, C = DefaultKeyComparator<K>> {
    root_: Node<K>,
    params_: BTreeParams,
    size_: usize,
    key_cmp: C,
}

impl<K: Ord> BTree<K> {
    pub fn new(order: usize) -> Result<Self> {
        Self::with_comparator(order, DefaultKeyComparator::new())
    }
}

impl<K, C: KeyComparator<K>> BTree<K, C> {
    pub fn with_comparator(order: usize, key_cmp: C) -> Result<Self> {
        Ok(Self::with_params(BTreeParams::new(order)?, key_cmp))
    }

    pub fn with_params(params: BTreeParams, key_cmp: C) -> Self {
        Self::from_root(params, key_cmp, Node::default())
    }

    /// Adopt an existing node structure as-is. Nothing is validated; see
    /// [`BTree::verify`].
    pub fn from_root(params: BTreeParams, key_cmp: C, root: Node<K>) -> Self {
        let size = TreeStats::collect(&root).size;
        Self {
            root_: root,
            params_: params,
            size_: size,
            key_cmp,
        }
    }

    fn ctx(&self) -> NodeCtx<'_, C> {
        NodeCtx {
            params: &self.params_,
            key_cmp: &self.key_cmp,
        }
    }
}

/// Access Functions
impl<K, C> BTree<K, C> {
    pub fn root(&self) -> &Node<K> {
        &self.root_
    }

    pub fn into_root(self) -> Node<K> {
        self.root_
    }

    pub fn params(&self) -> &BTreeParams {
        &self.params_
    }

    pub fn key_comp(&self) -> &C {
        &self.key_cmp
    }

    pub fn len(&self) -> usize {
        self.size_
    }

    pub fn is_empty(&self) -> bool {
        self.root_.slotuse() == 0 && self.root_.is_leafnode()
    }

    pub fn height(&self) -> usize {
        self.stats().height
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats::collect(&self.root_)
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root_)
    }

    pub fn clear(&mut self) {
        self.root_ = Node::default();
        self.size_ = 0;
    }

    pub fn minimum(&self) -> Result<&K> {
        if self.is_empty() {
            return Err(BTreeError::EmptyTree);
        }
        self.root_.find_smallest()
    }

    pub fn maximum(&self) -> Result<&K> {
        if self.is_empty() {
            return Err(BTreeError::EmptyTree);
        }
        self.root_.find_largest()
    }
}

impl<K: Clone, C> BTree<K, C> {
    /// All keys in ascending order.
    pub fn traverse(&self) -> Vec<K> {
        let mut acc = Vec::with_capacity(self.size_);
        self.root_.traverse(&mut acc);
        acc.into_iter().cloned().collect()
    }
}

/// Querying
impl<K, C: KeyComparator<K>> BTree<K, C> {
    pub fn search(&self, key: &K) -> bool {
        !self.is_empty() && self.root_.search_key(key, &self.key_cmp)
    }
}

/// Insertion
impl<K: Debug, C: KeyComparator<K>> BTree<K, C> {
    /// Insert a key. Returns `false` without touching the tree when the key is
    /// already present and duplicates are not allowed.
    pub fn insert(&mut self, key: K) -> bool {
        if !self.params_.allow_duplicates() && self.search(&key) {
            log::debug!("BTree::insert: {:?} already present", key);
            return false;
        }

        let ctx = NodeCtx {
            params: &self.params_,
            key_cmp: &self.key_cmp,
        };
        let flags = self.root_.insert(key, &ctx);
        if flags.contains(InsertionFlags::Split) {
            log::debug!("BTree::insert: split nodes below the root");
        }
        if flags.contains(InsertionFlags::Overflow) {
            self.promote_root();
        }
        self.size_ += 1;

        self.self_verify("insert");
        true
    }

    /// Wrap the overflowing root in a fresh single-child root and split it.
    fn promote_root(&mut self) {
        log::debug!(
            "BTree::promote_root: root overflowed with {} keys",
            self.root_.slotuse()
        );
        let old = std::mem::take(&mut self.root_);
        self.root_ = Node::new(Vec::new(), vec![old]);
        self.root_.split_child(0, &self.params_);
    }

    /// Replace a keyless root with its sole child.
    fn demote_root(&mut self) {
        while self.root_.slotuse() == 0 && self.root_.children().len() == 1 {
            log::debug!("BTree::demote_root: height shrinks");
            if let Some(child) = self.root_.children.pop() {
                self.root_ = child;
            }
        }
    }

    /// Check every invariant of the tree, including the tracked size.
    pub fn verify(&self) -> Result<()> {
        let mut leaf_depth = None;
        let count = self
            .root_
            .verify(&self.ctx(), true, 0, &mut leaf_depth, (None, None))?;
        if count != self.size_ {
            return Err(BTreeError::Invariant(format!(
                "tree holds {} keys but tracks {}",
                count, self.size_
            )));
        }
        Ok(())
    }

    fn self_verify(&self, op: &str) {
        if !self.params_.self_verify() {
            return;
        }
        let result = self.verify();
        if let Err(e) = &result {
            log::error!("BTree::{} left the tree inconsistent: {}", op, e);
        }
        debug_assert!(result.is_ok(), "BTree::{}: {:?}", op, result);
    }
}

/// Erase
impl<K: Clone + Debug, C: KeyComparator<K>> BTree<K, C> {
    /// Remove one occurrence of `key`. Removing an absent key, or any key from
    /// an empty tree, is a no-op that returns `Ok(false)`.
    pub fn remove(&mut self, key: &K) -> Result<bool> {
        log::debug!("BTree::remove({:?}) on btree size {}", key, self.size_);
        if !self.search(key) {
            log::debug!("Could not find key {:?} to erase.", key);
            return Ok(false);
        }

        let ctx = NodeCtx {
            params: &self.params_,
            key_cmp: &self.key_cmp,
        };
        let result = self.root_.remove(key, &ctx)?;

        self.demote_root();
        if self.params_.is_overflow(self.root_.slotuse()) {
            self.promote_root();
        }
        if result.found() {
            self.size_ -= 1;
        }

        self.self_verify("remove");
        Ok(result.found())
    }
}

/// Debug
impl<K: Debug, C> BTree<K, C> {
    fn print_node(
        f: &mut std::fmt::Formatter<'_>,
        node: &Node<K>,
        depth: usize,
    ) -> std::fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        writeln!(
            f,
            "{} slotuse {} {:?}",
            if node.is_leafnode() { "leaf" } else { "inner" },
            node.slotuse(),
            node.keys()
        )?;

        for child in node.children() {
            Self::print_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl<K: Debug, C> Debug for BTree<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "btree order {} size {}",
            self.params_.order(),
            self.size_
        )?;
        Self::print_node(f, &self.root_, 0)
    }
}

impl<K: Clone, C: Clone> Clone for BTree<K, C> {
    fn clone(&self) -> Self {
        Self {
            root_: self.root_.clone(),
            params_: self.params_,
            size_: self.size_,
            key_cmp: self.key_cmp.clone(),
        }
    }
}

impl<'a, K, C> IntoIterator for &'a BTree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree_base::btree_traits::FnComparator;

    fn build(order: usize, keys: &[i32]) -> BTree<i32> {
        let params = BTreeParams::new(order).unwrap().with_self_verify(true);
        let mut tree = BTree::with_params(params, DefaultKeyComparator::new());
        for &k in keys {
            assert!(tree.insert(k));
        }
        tree
    }

    #[test]
    fn rejects_invalid_order() {
        assert!(matches!(
            BTree::<i32>::new(2),
            Err(BTreeError::InvalidOrder { order: 2 })
        ));
    }

    #[test]
    fn root_promotion_on_third_key() {
        let tree = build(3, &[1, 2]);
        assert_eq!(tree.height(), 1);

        let tree = build(3, &[1, 2, 3]);
        assert_eq!(tree.root().keys(), &[2]);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn root_demotion_after_merge() {
        let mut tree = build(3, &[1, 2, 3]);
        assert!(tree.remove(&3).unwrap());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.root().keys(), &[1, 2]);
        tree.verify().unwrap();
    }

    #[test]
    fn duplicates_rejected_by_default() {
        let mut tree = build(3, &[5]);
        assert!(!tree.insert(5));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn duplicates_allowed_when_configured() {
        let params = BTreeParams::new(3)
            .unwrap()
            .with_duplicates(true)
            .with_self_verify(true);
        let mut tree = BTree::with_params(params, DefaultKeyComparator::new());
        for k in [4, 4, 4, 1, 9, 4] {
            assert!(tree.insert(k));
        }
        assert_eq!(tree.traverse(), vec![1, 4, 4, 4, 4, 9]);

        assert!(tree.remove(&4).unwrap());
        assert_eq!(tree.traverse(), vec![1, 4, 4, 4, 9]);
        tree.verify().unwrap();
    }

    #[test]
    fn custom_comparator_orders_descending() {
        let mut tree =
            BTree::with_comparator(4, FnComparator::new(|a: &i32, b: &i32| b.cmp(a))).unwrap();
        for k in 0..20 {
            tree.insert(k);
        }
        let expected: Vec<i32> = (0..20).rev().collect();
        assert_eq!(tree.traverse(), expected);
        assert_eq!(tree.minimum().unwrap(), &19);
        assert_eq!(tree.maximum().unwrap(), &0);
        tree.verify().unwrap();
    }

    #[test]
    fn empty_tree_extremes_fail() {
        let tree = BTree::<i32>::new(3).unwrap();
        assert!(matches!(tree.minimum(), Err(BTreeError::EmptyTree)));
        assert!(matches!(tree.maximum(), Err(BTreeError::EmptyTree)));
    }

    #[test]
    fn clear_resets() {
        let mut tree = build(5, &[1, 2, 3, 4, 5, 6, 7]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(!tree.search(&3));
    }

    #[test]
    fn debug_output_lists_levels() {
        let tree = build(3, &[1, 2, 3]);
        let out = format!("{:?}", tree);
        assert!(out.contains("btree order 3 size 3"));
        assert!(out.contains("inner slotuse 1 [2]"));
        assert!(out.contains("  leaf slotuse 1 [1]"));
    }
}
