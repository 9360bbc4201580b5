use thiserror::Error;

#[derive(Debug, Error)]
pub enum BTreeError {
    /// A B-tree needs at least three-way branching.
    #[error("invalid branching order {order}: must be at least 3")]
    InvalidOrder { order: usize },

    #[error("tree is empty")]
    EmptyTree,

    #[error("node has no keys")]
    EmptyNode,

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("key must not be empty")]
    EmptyKey,

    #[error("invalid key range {start}..={end}")]
    InvalidRange { start: i64, end: i64 },
}

pub type Result<T> = std::result::Result<T, BTreeError>;
