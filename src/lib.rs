pub mod btree_base;
pub mod graphviz;
pub mod key;
pub mod snapshot;
pub mod workbench;

pub use btree_base::{
    btree::BTree,
    btree_traits::{BTreeParams, FnComparator, KeyComparator},
    error::{BTreeError, Result},
    iter::Iter,
    node::Node,
    tree_stats::TreeStats,
    DefaultBTree, DefaultKeyComparator,
};
pub use graphviz::GraphView;
pub use key::Key;
pub use snapshot::Snapshot;
pub use workbench::{KeyOutcome, Workbench};
