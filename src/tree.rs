//! The lazily hashed merkle tree.

use crate::{
    MerkleTreeError,
    hasher::{FnHasher, TreeHasher},
    height::TreeHeight,
    nodes::{Coordinate, Node, NodeKey},
    store::NodeStore,
};
use core::fmt;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// A binary merkle tree over an ordered, growing sequence of data blocks.
///
/// The tree keeps its root up to date incrementally:
///  * Writing a block stores the digest of its data as a leaf and marks every ancestor of that
///    leaf as stale. Nothing above the leaf is hashed on the write path.
///  * Asking for the [root](Self::root) walks down from the root node and rehashes only the stale
///    nodes it meets, caching each result. Untouched subtrees are served from the cache, so the
///    cost of a root query after a single write is proportional to the height of the tree.
///
/// Levels with an odd number of nodes are completed by reusing the last node of the level: when a
/// right child is missing, its left neighbour stands in for it. The root of the blocks `A, B, C`
/// is therefore `H(H(H(A) ‖ H(B)) ‖ H(H(C) ‖ H(C)))`.
///
/// Blocks are usually written densely from index `0`. Writing past the current end leaves a gap
/// of missing leaves; the root of such a tree is defined by the same substitution rule and fails
/// with [`MerkleTreeError::InvalidTree`] when a gap cannot be filled from the left.
///
/// The tree owns its node cache, so [`root`](Self::root) takes `&mut self`.
#[derive(Clone)]
pub struct MerkleTree<H: TreeHasher> {
    hasher: H,
    nodes: NodeStore<H::Digest>,
    height: TreeHeight,
    concat_buf: SmallVec<[u8; 64]>,
}

impl<H: TreeHasher + fmt::Debug> fmt::Debug for MerkleTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("hasher", &self.hasher)
            .field("width", &self.height.max_width())
            .field("height", &self.height.max_height())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl<H: TreeHasher + Default> Default for MerkleTree<H> {
    fn default() -> Self {
        Self::new(H::default())
    }
}

impl<F, D> MerkleTree<FnHasher<F>>
where
    F: Fn(&[u8]) -> D,
    D: AsRef<[u8]> + Clone + fmt::Debug,
{
    /// Creates an empty tree hashing with the function `f`.
    pub fn from_fn(f: F) -> Self {
        Self::new(FnHasher::new(f))
    }
}

impl<H: TreeHasher> MerkleTree<H> {
    /// Creates an empty tree hashing with `hasher`.
    pub fn new(hasher: H) -> Self {
        Self::with_capacity(hasher, 0)
    }

    /// Creates an empty tree with room for `nodes` nodes.
    ///
    /// A dense tree over `n` blocks holds slightly less than `2n` nodes.
    pub fn with_capacity(hasher: H, nodes: usize) -> Self {
        Self {
            hasher,
            nodes: NodeStore::with_capacity(nodes),
            height: TreeHeight::new(),
            concat_buf: SmallVec::new_const(),
        }
    }

    /// Number of leaf positions spanned by the tree: the highest written index plus one.
    pub const fn width(&self) -> u64 {
        self.height.max_width()
    }

    /// Number of levels of the tree, including the leaf level.
    pub const fn height(&self) -> u8 {
        self.height.max_height()
    }

    /// Number of nodes currently materialized in the store.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no block has been written yet.
    pub const fn is_empty(&self) -> bool {
        self.height.max_width() == 0
    }

    /// Position of the root node, or `None` if the tree is empty.
    pub const fn root_coordinate(&self) -> Option<Coordinate> {
        match self.height.root_level() {
            Some(level) => Some(Coordinate::new(level, 0)),
            None => None,
        }
    }

    /// Returns the digest stored for the leaf at `index`, if that block was written.
    pub fn leaf_digest(&self, index: u64) -> Option<&H::Digest> {
        let key = NodeKey::new(0, index).ok()?;
        self.nodes.get(key).and_then(Node::digest)
    }

    /// Returns `true` if the node at `coordinate` has no cached digest.
    ///
    /// Nodes that were never materialized are reported as stale as well.
    pub fn is_stale(&self, coordinate: Coordinate) -> bool {
        NodeKey::from_coordinate(coordinate)
            .ok()
            .and_then(|key| self.nodes.get(key))
            .is_none_or(Node::is_stale)
    }

    /// Sets the data of the block at `index`, replacing any previous data.
    ///
    /// The tree grows to cover `index` if needed. Only the leaf is hashed; its ancestors are
    /// marked stale and rehashed by the next call to [`root`](Self::root).
    pub fn set_block_data(&mut self, index: u64, data: &[u8]) -> Result<(), MerkleTreeError> {
        let key = NodeKey::new(0, index)?;
        let digest = self.hasher.hash(data);
        trace!(target: "merkle::tree", index, len = data.len(), ?digest, "setting block data");
        self.write_leaf(key, digest)
    }

    /// Sets the leaf at `index` to a precomputed block digest.
    ///
    /// Behaves like [`set_block_data`](Self::set_block_data) for a block whose data hashes to
    /// `digest`.
    pub fn set_leaf_digest(
        &mut self,
        index: u64,
        digest: H::Digest,
    ) -> Result<(), MerkleTreeError> {
        let key = NodeKey::new(0, index)?;
        trace!(target: "merkle::tree", index, ?digest, "setting leaf digest");
        self.write_leaf(key, digest)
    }

    /// Writes consecutive blocks starting at index `start`.
    ///
    /// Returns the index following the last written block. Stops at the first block that cannot
    /// be written; blocks before it stay written.
    pub fn extend_blocks<I>(&mut self, start: u64, blocks: I) -> Result<u64, MerkleTreeError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut index = start;
        for block in blocks {
            self.set_block_data(index, block.as_ref())?;
            index += 1;
        }
        Ok(index)
    }

    /// Returns the root digest of the tree, rehashing every stale node on the way.
    ///
    /// Returns [`MerkleTreeError::EmptyTree`] if no block has been written.
    pub fn root(&mut self) -> Result<H::Digest, MerkleTreeError> {
        let root = self.root_coordinate().ok_or(MerkleTreeError::EmptyTree)?;
        let digest = self.compute(root)?;
        trace!(target: "merkle::tree", %root, ?digest, "computed root");
        Ok(digest)
    }

    fn write_leaf(&mut self, key: NodeKey, digest: H::Digest) -> Result<(), MerkleTreeError> {
        let index = key.width();
        if self.height.grow_to(index + 1) {
            debug!(
                target: "merkle::tree",
                width = self.height.max_width(),
                height = self.height.max_height(),
                "tree grew"
            );
        }

        self.nodes.get_or_create(key).set_digest(digest);
        self.invalidate_ancestors(index)
    }

    /// Marks the ancestors of the leaf at `index` as stale, up to and including the root level.
    fn invalidate_ancestors(&mut self, index: u64) -> Result<(), MerkleTreeError> {
        let mut node = Coordinate::leaf(index);
        for _ in 1..self.height.max_height() {
            node = node.parent();
            self.nodes.get_or_create(NodeKey::from_coordinate(node)?).invalidate();
        }
        trace!(
            target: "merkle::tree",
            index,
            levels = self.height.max_height().saturating_sub(1),
            "invalidated ancestors"
        );
        Ok(())
    }

    /// Finds the node standing at `coordinate`: the node itself, or its left neighbour when the
    /// level is incomplete.
    fn resolve(&self, coordinate: Coordinate) -> Result<NodeKey, MerkleTreeError> {
        let key = NodeKey::from_coordinate(coordinate)?;
        if self.nodes.contains(key) {
            return Ok(key);
        }

        let invalid =
            MerkleTreeError::InvalidTree { height: coordinate.height, width: coordinate.width };
        let neighbour = coordinate.left_neighbour().ok_or(invalid)?;
        let key = NodeKey::from_coordinate(neighbour)?;
        if !self.nodes.contains(key) {
            return Err(invalid);
        }

        trace!(target: "merkle::tree", %coordinate, %neighbour, "substituting left neighbour");
        Ok(key)
    }

    /// Returns the digest of the node at `coordinate`, recomputing and caching it if stale.
    ///
    /// A stale substitute is rehashed from the children below `coordinate` and cached in the
    /// substitute. Recursion depth is bounded by the height of the tree.
    fn compute(&mut self, coordinate: Coordinate) -> Result<H::Digest, MerkleTreeError> {
        let key = self.resolve(coordinate)?;
        if let Some(digest) = self.nodes.get(key).and_then(Node::digest) {
            trace!(target: "merkle::tree", %coordinate, "cache hit");
            return Ok(digest.clone());
        }

        // Leaves are always stored with a digest, so a stale node here has children.
        let (left, right) = coordinate.children().ok_or(MerkleTreeError::InvalidTree {
            height: coordinate.height,
            width: coordinate.width,
        })?;

        let left = self.compute(left)?;
        let right = self.compute(right)?;

        self.concat_buf.clear();
        self.concat_buf.extend_from_slice(left.as_ref());
        self.concat_buf.extend_from_slice(right.as_ref());
        let digest = self.hasher.hash(&self.concat_buf);
        trace!(target: "merkle::tree", %coordinate, ?digest, "rehashed stale node");

        self.nodes.get_or_create(key).set_digest(digest.clone());
        Ok(digest)
    }
}
