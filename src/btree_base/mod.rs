pub mod btree;
pub mod btree_traits;
pub mod deletion;
pub mod error;
pub mod iter;
pub mod node;
pub mod tree_stats;

use self::{btree::BTree, btree_traits::KeyComparator};
use std::{cmp::Ordering, fmt::Debug, marker::PhantomData};

/// Orders keys by their `Ord` implementation.
pub struct DefaultKeyComparator<T> {
    _t: PhantomData<T>,
}

impl<T> DefaultKeyComparator<T> {
    pub fn new() -> Self {
        Self { _t: PhantomData }
    }
}

impl<T> Default for DefaultKeyComparator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for DefaultKeyComparator<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Debug for DefaultKeyComparator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DefaultKeyComparator")
    }
}

impl<T: Ord> KeyComparator<T> for DefaultKeyComparator<T> {
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

pub type DefaultBTree<K> = BTree<K, DefaultKeyComparator<K>>;
