use std::fmt::Debug;

use super::{
    btree_traits::{BTreeParams, KeyComparator},
    deletion::{DeletionFlags, DeletionResult, InsertionFlags},
    error::{BTreeError, Result},
};

/// Borrowed view of the tree-wide settings every node algorithm needs.
pub(crate) struct NodeCtx<'a, C> {
    pub params: &'a BTreeParams,
    pub key_cmp: &'a C,
}

/// A B-tree node. Leaf when `children` is empty, otherwise it holds exactly
/// `keys.len() + 1` children.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<Node<K>>,
}

impl<K> Default for Node<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl<K> Node<K> {
    pub fn new(keys: Vec<K>, children: Vec<Node<K>>) -> Self {
        Self { keys, children }
    }

    pub fn leaf(keys: Vec<K>) -> Self {
        Self::new(keys, Vec::new())
    }

    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub fn children(&self) -> &[Node<K>] {
        &self.children
    }

    #[inline]
    pub fn slotuse(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_leafnode(&self) -> bool {
        self.children.is_empty()
    }

    pub fn find_largest(&self) -> Result<&K> {
        match self.children.last() {
            Some(child) => child.find_largest(),
            None => self.keys.last().ok_or(BTreeError::EmptyNode),
        }
    }

    pub fn find_smallest(&self) -> Result<&K> {
        match self.children.first() {
            Some(child) => child.find_smallest(),
            None => self.keys.first().ok_or(BTreeError::EmptyNode),
        }
    }

    /// In-order walk appending every key of this subtree to `acc`.
    pub fn traverse<'a>(&'a self, acc: &mut Vec<&'a K>) {
        for (i, key) in self.keys.iter().enumerate() {
            if let Some(child) = self.children.get(i) {
                child.traverse(acc);
            }
            acc.push(key);
        }
        if let Some(child) = self.children.get(self.keys.len()) {
            child.traverse(acc);
        }
    }

    /// Smallest slot whose key is not less than `key`, or `slotuse()` if none.
    pub fn find_child_slot<C: KeyComparator<K>>(&self, key: &K, key_cmp: &C) -> usize {
        let mut lo = 0;
        while lo < self.keys.len() && key_cmp.less(&self.keys[lo], key) {
            lo += 1;
        }
        lo
    }

    pub fn search_key<C: KeyComparator<K>>(&self, key: &K, key_cmp: &C) -> bool {
        let slot = self.find_child_slot(key, key_cmp);
        if slot < self.keys.len() && key_cmp.equal(&self.keys[slot], key) {
            true
        } else if self.is_leafnode() {
            false
        } else {
            match self.children.get(slot) {
                Some(child) => child.search_key(key, key_cmp),
                None => false,
            }
        }
    }
}

/// Insertion
impl<K: Debug> Node<K> {
    /// Insert into the subtree, then split any child that overflowed on the
    /// way back up. Reports `Overflow` when this node itself must be split by
    /// its owner.
    pub(crate) fn insert<C: KeyComparator<K>>(
        &mut self,
        key: K,
        ctx: &NodeCtx<'_, C>,
    ) -> InsertionFlags {
        let slot = self.find_child_slot(&key, ctx.key_cmp);
        let mut flags = InsertionFlags::Ok;

        if self.is_leafnode() {
            log::debug!("Node::insert: {:?} into leaf at slot {}", key, slot);
            self.keys.insert(slot, key);
        } else {
            let child_flags = self.children[slot].insert(key, ctx);
            flags = flags | (child_flags & InsertionFlags::Split);
            if ctx.params.is_overflow(self.children[slot].slotuse()) {
                self.split_child(slot, ctx.params);
                flags = flags | InsertionFlags::Split;
            }
        }

        if ctx.params.is_overflow(self.slotuse()) {
            flags = flags | InsertionFlags::Overflow;
        }
        flags
    }

    /// Split the overflowing `children[idx]` around the median slot and lift
    /// the median key into this node at `idx`.
    pub(crate) fn split_child(&mut self, idx: usize, params: &BTreeParams) {
        let median = params.split_median();
        let child = &mut self.children[idx];
        debug_assert!(params.is_overflow(child.slotuse()));

        let right_keys = child.keys.split_off(median + 1);
        let right_children = if child.is_leafnode() {
            Vec::new()
        } else {
            child.children.split_off(median + 1)
        };
        let upkey = child.keys.remove(median);

        log::debug!(
            "Node::split_child: idx {} median {} upkey {:?} left {} right {}",
            idx,
            median,
            upkey,
            child.slotuse(),
            right_keys.len()
        );

        self.keys.insert(idx, upkey);
        self.children.insert(idx + 1, Node::new(right_keys, right_children));
    }
}

/// Erase
impl<K: Clone + Debug> Node<K> {
    pub(crate) fn remove<C: KeyComparator<K>>(
        &mut self,
        key: &K,
        ctx: &NodeCtx<'_, C>,
    ) -> Result<DeletionResult<K>> {
        let slot = self.find_child_slot(key, ctx.key_cmp);
        let found = slot < self.keys.len() && ctx.key_cmp.equal(&self.keys[slot], key);

        if found {
            self.remove_here(slot, key, ctx)
        } else if self.is_leafnode() {
            log::debug!("Could not find key {:?} to erase.", key);
            Ok(DeletionResult::new(DeletionFlags::NotFound))
        } else {
            self.remove_below(slot, key, ctx)
        }
    }

    /// The key sits in this node at `slot`.
    fn remove_here<C: KeyComparator<K>>(
        &mut self,
        slot: usize,
        key: &K,
        ctx: &NodeCtx<'_, C>,
    ) -> Result<DeletionResult<K>> {
        if self.is_leafnode() {
            log::debug!("Found key {:?} in leaf at slot {}", key, slot);
            let removed = self.keys.remove(slot);
            return Ok(DeletionResult::new_with_key(DeletionFlags::Ok, removed));
        }

        let min_keys = ctx.params.min_keys();

        if self.children[slot].slotuse() > min_keys {
            // replace with the predecessor, then erase it from the left subtree
            let pred = self.children[slot].find_largest()?.clone();
            log::debug!("Node::remove: {:?} replaced by predecessor {:?}", key, pred);
            let old = std::mem::replace(&mut self.keys[slot], pred.clone());
            let mut res = self.children[slot].remove(&pred, ctx)?;
            res.removed = Some(old);
            self.fix_overflow(slot, ctx.params, &mut res);
            return Ok(res);
        }

        if self.children[slot + 1].slotuse() > min_keys {
            let succ = self.children[slot + 1].find_smallest()?.clone();
            log::debug!("Node::remove: {:?} replaced by successor {:?}", key, succ);
            let old = std::mem::replace(&mut self.keys[slot], succ.clone());
            let mut res = self.children[slot + 1].remove(&succ, ctx)?;
            res.removed = Some(old);
            self.fix_overflow(slot + 1, ctx.params, &mut res);
            return Ok(res);
        }

        // both neighbours at minimum: pull the separator down into a merged
        // child and keep chasing the key there
        self.merge_children(slot);
        let mut res = self.children[slot].remove(key, ctx)?;
        res |= DeletionFlags::Merged;
        self.fix_overflow(slot, ctx.params, &mut res);
        Ok(res)
    }

    /// The key can only be below `children[slot]`. Top that child up first if
    /// it sits at minimum occupancy.
    fn remove_below<C: KeyComparator<K>>(
        &mut self,
        slot: usize,
        key: &K,
        ctx: &NodeCtx<'_, C>,
    ) -> Result<DeletionResult<K>> {
        let params = ctx.params;
        let mut idx = slot;
        let mut flags = DeletionFlags::Ok;

        if params.is_few(self.children[idx].slotuse()) {
            let left_few = (idx > 0).then(|| params.is_few(self.children[idx - 1].slotuse()));
            let right_few = self
                .children
                .get(idx + 1)
                .map(|right| params.is_few(right.slotuse()));

            match (left_few, right_few) {
                (Some(true), None) | (Some(true), Some(true)) => {
                    self.merge_children(idx - 1);
                    idx -= 1;
                    flags = flags | DeletionFlags::Merged;
                }
                (None, Some(true)) => {
                    self.merge_children(idx);
                    flags = flags | DeletionFlags::Merged;
                }
                (Some(false), _) => {
                    self.shift_right(idx);
                    flags = flags | DeletionFlags::Rotated;
                }
                (_, Some(false)) => {
                    self.shift_left(idx);
                    flags = flags | DeletionFlags::Rotated;
                }
                // a lone child has no sibling to lean on
                (None, None) => {}
            }
        }

        let mut res = self.children[idx].remove(key, ctx)?;
        res |= flags;
        self.fix_overflow(idx, ctx.params, &mut res);
        Ok(res)
    }

    /// Fold `children[idx + 1]` and the separator `keys[idx]` into
    /// `children[idx]`. The right node is dropped.
    fn merge_children(&mut self, idx: usize) {
        let separator = self.keys.remove(idx);
        let mut right = self.children.remove(idx + 1);

        log::debug!(
            "Node::merge_children: idx {} separator {:?} absorbing {} keys",
            idx,
            separator,
            right.slotuse()
        );

        let left = &mut self.children[idx];
        left.keys.push(separator);
        left.keys.append(&mut right.keys);
        left.children.append(&mut right.children);
    }

    /// Rotate the last key of `children[idx - 1]` through the parent into the
    /// front of `children[idx]`.
    fn shift_right(&mut self, idx: usize) {
        let left = &mut self.children[idx - 1];
        let Some(upkey) = left.keys.pop() else {
            return;
        };
        let moved_child = left.children.pop();

        let downkey = std::mem::replace(&mut self.keys[idx - 1], upkey);
        log::debug!("Node::shift_right: idx {} downkey {:?}", idx, downkey);

        let target = &mut self.children[idx];
        target.keys.insert(0, downkey);
        if let Some(child) = moved_child {
            target.children.insert(0, child);
        }
    }

    /// Rotate the first key of `children[idx + 1]` through the parent onto the
    /// end of `children[idx]`.
    fn shift_left(&mut self, idx: usize) {
        let right = &mut self.children[idx + 1];
        if right.keys.is_empty() {
            return;
        }
        let upkey = right.keys.remove(0);
        let moved_child = if right.is_leafnode() {
            None
        } else {
            Some(right.children.remove(0))
        };

        let downkey = std::mem::replace(&mut self.keys[idx], upkey);
        log::debug!("Node::shift_left: idx {} downkey {:?}", idx, downkey);

        let target = &mut self.children[idx];
        target.keys.push(downkey);
        if let Some(child) = moved_child {
            target.children.push(child);
        }
    }

    /// For odd orders a merged child holds `max_keys + 1` keys until the
    /// deletion under it takes one away. Split it if that never happened.
    fn fix_overflow(&mut self, idx: usize, params: &BTreeParams, res: &mut DeletionResult<K>) {
        if params.is_overflow(self.children[idx].slotuse()) {
            self.split_child(idx, params);
            *res |= DeletionFlags::Split;
        }
    }
}

/// Verification
impl<K: Debug> Node<K> {
    /// Check this subtree against every structural invariant and return the
    /// number of keys it holds.
    pub(crate) fn verify<C: KeyComparator<K>>(
        &self,
        ctx: &NodeCtx<'_, C>,
        is_root: bool,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        bounds: (Option<&K>, Option<&K>),
    ) -> Result<usize> {
        let params = ctx.params;
        let ordered = |a: &K, b: &K| {
            if params.allow_duplicates() {
                !ctx.key_cmp.less(b, a)
            } else {
                ctx.key_cmp.less(a, b)
            }
        };

        if params.is_overflow(self.slotuse()) {
            return Err(BTreeError::Invariant(format!(
                "node {:?} at depth {} holds more than {} keys",
                self.keys,
                depth,
                params.max_keys()
            )));
        }
        if !is_root && self.slotuse() < params.min_keys() {
            return Err(BTreeError::Invariant(format!(
                "node {:?} at depth {} holds fewer than {} keys",
                self.keys,
                depth,
                params.min_keys()
            )));
        }
        if is_root && self.keys.is_empty() && !self.is_leafnode() {
            return Err(BTreeError::Invariant("keyless root still has children".into()));
        }

        if let Some(pair) = self.keys.windows(2).find(|w| !ordered(&w[0], &w[1])) {
            return Err(BTreeError::Invariant(format!(
                "keys {:?} and {:?} out of order",
                pair[0], pair[1]
            )));
        }
        let (lower, upper) = bounds;
        if let (Some(lo), Some(first)) = (lower, self.keys.first()) {
            if !ordered(lo, first) {
                return Err(BTreeError::Invariant(format!(
                    "key {:?} not above separator {:?}",
                    first, lo
                )));
            }
        }
        if let (Some(hi), Some(last)) = (upper, self.keys.last()) {
            if !ordered(last, hi) {
                return Err(BTreeError::Invariant(format!(
                    "key {:?} not below separator {:?}",
                    last, hi
                )));
            }
        }

        if self.is_leafnode() {
            match *leaf_depth {
                Some(d) if d != depth => {
                    return Err(BTreeError::Invariant(format!(
                        "leaf at depth {} but another at depth {}",
                        depth, d
                    )))
                }
                Some(_) => {}
                None => *leaf_depth = Some(depth),
            }
            return Ok(self.slotuse());
        }

        if self.children.len() != self.keys.len() + 1 {
            return Err(BTreeError::Invariant(format!(
                "node {:?} has {} children",
                self.keys,
                self.children.len()
            )));
        }

        let mut count = self.slotuse();
        for (i, child) in self.children.iter().enumerate() {
            let lo = if i == 0 { lower } else { self.keys.get(i - 1) };
            let hi = self.keys.get(i).or(upper);
            count += child.verify(ctx, false, depth + 1, leaf_depth, (lo, hi))?;
        }
        Ok(count)
    }
}
