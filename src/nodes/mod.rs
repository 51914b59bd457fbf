//! Nodes of the merkle tree and their packed store keys.

mod key;
pub use key::{Coordinate, MAX_HEIGHT, MAX_WIDTH, NodeKey, WIDTH_BITS};

/// A single vertex of the tree.
///
/// A node without a digest is stale: one of the leaves below it changed since the digest was
/// last computed.
///
/// The position of a node is the [`NodeKey`] it is stored under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<D> {
    digest: Option<D>,
}

impl<D> Default for Node<D> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Node<D> {
    /// Creates a new stale node.
    #[inline]
    pub const fn new() -> Self {
        Self { digest: None }
    }

    /// Returns the cached digest, if the node is not stale.
    #[inline]
    pub const fn digest(&self) -> Option<&D> {
        self.digest.as_ref()
    }

    /// Returns `true` if the digest has to be recomputed before use.
    #[inline]
    pub const fn is_stale(&self) -> bool {
        self.digest.is_none()
    }

    /// Replaces the cached digest.
    #[inline]
    pub fn set_digest(&mut self, digest: D) {
        self.digest = Some(digest);
    }

    /// Drops the cached digest, marking the node as stale.
    #[inline]
    pub fn invalidate(&mut self) {
        self.digest = None;
    }
}
