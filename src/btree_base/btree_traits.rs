use std::cmp::Ordering;
use std::fmt::{self, Debug};

use super::error::{BTreeError, Result};

// Traits bound
pub trait KeyComparator<T> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;

    fn less(&self, lhs: &T, rhs: &T) -> bool {
        self.compare(lhs, rhs) == Ordering::Less
    }

    fn equal(&self, lhs: &T, rhs: &T) -> bool {
        self.compare(lhs, rhs) == Ordering::Equal
    }
}

/// Adapts any `Fn(&T, &T) -> Ordering` into a [`KeyComparator`].
#[derive(Clone)]
pub struct FnComparator<F> {
    f: F,
}

impl<F> FnComparator<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<T, F> KeyComparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        (self.f)(lhs, rhs)
    }
}

impl<F> Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}

/// Capacity bounds derived from the branching order, plus the tree's
/// behavioural switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BTreeParams {
    order: usize,
    max_keys: usize,
    min_keys: usize,
    split_median: usize,
    allow_duplicates: bool,
    self_verify: bool,
}

impl BTreeParams {
    pub const MIN_ORDER: usize = 3;

    pub fn new(order: usize) -> Result<Self> {
        if order < Self::MIN_ORDER {
            return Err(BTreeError::InvalidOrder { order });
        }

        Ok(Self {
            order,
            max_keys: order - 1,
            min_keys: order.div_ceil(2) - 1,
            // round(order / 2) - 1 with halves rounded up
            split_median: (order + 1) / 2 - 1,
            allow_duplicates: false,
            self_verify: false,
        })
    }

    pub fn with_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }

    pub fn with_self_verify(mut self, verify: bool) -> Self {
        self.self_verify = verify;
        self
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    #[inline]
    pub fn min_keys(&self) -> usize {
        self.min_keys
    }

    #[inline]
    pub fn split_median(&self) -> usize {
        self.split_median
    }

    #[inline]
    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    #[inline]
    pub fn self_verify(&self) -> bool {
        self.self_verify
    }

    #[inline]
    pub fn is_overflow(&self, slotuse: usize) -> bool {
        slotuse > self.max_keys
    }

    /// Exactly at the minimum steady-state occupancy.
    #[inline]
    pub fn is_few(&self, slotuse: usize) -> bool {
        slotuse == self.min_keys
    }
}
