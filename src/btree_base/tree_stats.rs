use super::{btree_traits::BTreeParams, node::Node};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub size: usize,
    pub leaves: usize,
    pub inner_nodes: usize,
    pub height: usize,
}

impl TreeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn collect<K>(root: &Node<K>) -> Self {
        let mut stats = Self::new();
        if root.slotuse() == 0 && root.is_leafnode() {
            return stats;
        }
        stats.visit(root, 1);
        stats
    }

    fn visit<K>(&mut self, node: &Node<K>, depth: usize) {
        self.size += node.slotuse();
        self.height = self.height.max(depth);
        if node.is_leafnode() {
            self.leaves += 1;
        } else {
            self.inner_nodes += 1;
            for child in node.children() {
                self.visit(child, depth + 1);
            }
        }
    }

    pub fn nodes(&self) -> usize {
        self.inner_nodes + self.leaves
    }

    /// Average fill ratio over all nodes.
    pub fn avgfill(&self, params: &BTreeParams) -> f64 {
        if self.nodes() == 0 {
            return 0.0;
        }
        self.size as f64 / (self.nodes() * params.max_keys()) as f64
    }
}
