use thiserror::Error;

/// Error type for merkle tree operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MerkleTreeError {
    /// The root was requested before any block was written.
    #[error("invalid merkle tree: no blocks have been written")]
    EmptyTree,

    /// Neither the node nor its left neighbour exist in the store.
    #[error("invalid merkle tree: no node at height {height}, width {width} or its left neighbour")]
    InvalidTree {
        /// Height of the unresolved node.
        height: u8,
        /// Width of the unresolved node.
        width: u64,
    },

    /// The coordinate does not fit in a packed node key.
    #[error("coordinate out of range: height {height}, width {width}")]
    CoordinateOutOfRange {
        /// The requested height.
        height: u64,
        /// The requested width.
        width: u64,
    },
}

impl MerkleTreeError {
    /// Returns `true` if the error reports an unusable tree rather than a bad argument.
    pub const fn is_invalid_tree(&self) -> bool {
        matches!(self, Self::EmptyTree | Self::InvalidTree { .. })
    }
}
