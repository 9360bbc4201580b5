use std::iter::FusedIterator;

use super::node::Node;

/// Borrowing in-order iterator over the keys of a tree.
///
/// Keeps the path from the root to the current position; every entry holds
/// the next key slot still to be yielded in that node.
#[derive(Clone, Debug)]
pub struct Iter<'a, K> {
    stack: Vec<(&'a Node<K>, usize)>,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: &'a Node<K>) -> Self {
        let mut it = Self { stack: Vec::new() };
        it.descend(Some(root));
        it
    }

    fn descend(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(n) = node {
            self.stack.push((n, 0));
            node = n.children().first();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let (node, slot) = *top;
            if slot < node.slotuse() {
                top.1 += 1;
                self.descend(node.children().get(slot + 1));
                return Some(&node.keys()[slot]);
            }
            self.stack.pop();
        }
    }
}

impl<K> FusedIterator for Iter<'_, K> {}
