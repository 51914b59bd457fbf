use crate::nodes::{Coordinate, Node, NodeKey};
use alloy_primitives::map::HashMap;

/// Sparse storage for tree nodes.
///
/// Only nodes that were written or invalidated at least once are materialized, so a tree over
/// `n` blocks holds roughly `2n` nodes regardless of how they are laid out. Nodes are created on
/// first use and never removed.
#[derive(Debug, Clone)]
pub struct NodeStore<D> {
    nodes: HashMap<NodeKey, Node<D>>,
}

impl<D> NodeStore<D> {
    /// Creates a new store with room for `capacity` nodes.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { nodes: HashMap::with_capacity_and_hasher(capacity, Default::default()) }
    }

    /// Creates a new empty store.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Returns the node stored under `key`, without creating it.
    #[inline]
    pub fn get(&self, key: NodeKey) -> Option<&Node<D>> {
        self.nodes.get(&key)
    }

    /// Returns the node stored under `key`, inserting a stale node if there is none.
    #[inline]
    pub fn get_or_create(&mut self, key: NodeKey) -> &mut Node<D> {
        self.nodes.entry(key).or_default()
    }

    /// Returns `true` if a node is stored under `key`.
    #[inline]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    /// Returns the number of stored nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been stored yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of nodes the store can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns an iterator over the stored nodes, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Node<D>)> + '_ {
        self.nodes.iter().map(|(key, node)| (key.coordinate(), node))
    }
}

impl<D> Default for NodeStore<D> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(height: u64, width: u64) -> NodeKey {
        NodeKey::new(height, width).unwrap()
    }

    #[test]
    fn get_does_not_create() {
        let store: NodeStore<[u8; 4]> = NodeStore::new();
        assert!(store.get(key(0, 0)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn get_or_create_inserts_once() {
        let mut store: NodeStore<[u8; 4]> = NodeStore::with_capacity(8);
        assert!(store.capacity() >= 8);

        let node = store.get_or_create(key(2, 5));
        assert!(node.is_stale());
        node.set_digest([1, 2, 3, 4]);

        // Second lookup returns the same node, digest intact.
        assert_eq!(store.get_or_create(key(2, 5)).digest(), Some(&[1, 2, 3, 4]));
        assert_eq!(store.len(), 1);
        assert!(store.contains(key(2, 5)));
        assert!(!store.contains(key(5, 2)));
    }

    #[test]
    fn distinct_coordinates_do_not_alias() {
        let mut store: NodeStore<u8> = NodeStore::new();
        store.get_or_create(key(1, 0)).set_digest(1);
        store.get_or_create(key(0, 1 << 24)).set_digest(2);
        store.get_or_create(key(0, 0)).set_digest(3);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(key(1, 0)).and_then(Node::digest), Some(&1));
        assert_eq!(store.get(key(0, 1 << 24)).and_then(Node::digest), Some(&2));
        assert_eq!(store.get(key(0, 0)).and_then(Node::digest), Some(&3));
    }

    #[test]
    fn iter_yields_coordinates() {
        let mut store: NodeStore<u8> = NodeStore::new();
        store.get_or_create(key(0, 3));
        store.get_or_create(key(1, 1)).set_digest(9);

        let mut seen: alloc::vec::Vec<_> =
            store.iter().map(|(coordinate, node)| (coordinate, node.digest().copied())).collect();
        seen.sort();
        assert_eq!(seen, [(Coordinate::new(0, 3), None), (Coordinate::new(1, 1), Some(9))]);
    }
}
