use crate::MerkleTreeError;
use core::fmt;
use derive_more::{Deref, Display};

/// Number of bits of a [`NodeKey`] reserved for the width.
pub const WIDTH_BITS: u32 = 56;

/// Exclusive upper bound on the height of a node.
pub const MAX_HEIGHT: u64 = 1 << (u64::BITS - WIDTH_BITS);

/// Exclusive upper bound on the width of a node, and therefore on the number of blocks.
pub const MAX_WIDTH: u64 = 1 << WIDTH_BITS;

const WIDTH_MASK: u64 = MAX_WIDTH - 1;

/// Position of a node in the tree.
///
/// Height `0` is the leaf level; width is the 0-based index of the node within its level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("({height}, {width})")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(derive_arbitrary::Arbitrary, proptest_derive::Arbitrary))]
pub struct Coordinate {
    /// Level of the node, counted from the leaves.
    pub height: u8,
    /// Index of the node within its level.
    pub width: u64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub const fn new(height: u8, width: u64) -> Self {
        Self { height, width }
    }

    /// Creates the coordinate of the leaf at `index`.
    #[inline]
    pub const fn leaf(index: u64) -> Self {
        Self::new(0, index)
    }

    /// Returns the coordinate of the parent node.
    #[inline]
    pub const fn parent(self) -> Self {
        Self::new(self.height + 1, self.width / 2)
    }

    /// Returns the coordinates of the left and right children, or `None` for a leaf.
    #[inline]
    pub const fn children(self) -> Option<(Self, Self)> {
        if self.height == 0 {
            return None;
        }
        let left = Self::new(self.height - 1, self.width * 2);
        Some((left, Self::new(left.height, left.width + 1)))
    }

    /// Returns the coordinate directly to the left on the same level, if any.
    #[inline]
    pub const fn left_neighbour(self) -> Option<Self> {
        match self.width.checked_sub(1) {
            Some(width) => Some(Self::new(self.height, width)),
            None => None,
        }
    }
}

/// Packed store key of a node.
///
/// ```text
/// +--------+----------------------------+
/// | height |           width            |
/// | 8 bits |          56 bits           |
/// +--------+----------------------------+
/// ```
///
/// Construction is checked: coordinates outside [`MAX_HEIGHT`] and [`MAX_WIDTH`] are rejected
/// instead of aliasing another node.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deref)]
pub struct NodeKey(u64);

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({:#018x})", self.0)
    }
}

impl NodeKey {
    /// Packs a height and width into a key.
    #[inline]
    pub const fn new(height: u64, width: u64) -> Result<Self, MerkleTreeError> {
        if height >= MAX_HEIGHT || width >= MAX_WIDTH {
            return Err(MerkleTreeError::CoordinateOutOfRange { height, width });
        }
        Ok(Self((height << WIDTH_BITS) | width))
    }

    /// Packs a coordinate into a key.
    #[inline]
    pub const fn from_coordinate(coordinate: Coordinate) -> Result<Self, MerkleTreeError> {
        Self::new(coordinate.height as u64, coordinate.width)
    }

    /// Returns the raw key.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the height stored in the key.
    #[inline]
    pub const fn height(self) -> u8 {
        (self.0 >> WIDTH_BITS) as u8
    }

    /// Returns the width stored in the key.
    #[inline]
    pub const fn width(self) -> u64 {
        self.0 & WIDTH_MASK
    }

    /// Unpacks the key.
    #[inline]
    pub const fn coordinate(self) -> Coordinate {
        Coordinate::new(self.height(), self.width())
    }
}

impl TryFrom<Coordinate> for NodeKey {
    type Error = MerkleTreeError;

    #[inline]
    fn try_from(coordinate: Coordinate) -> Result<Self, Self::Error> {
        Self::from_coordinate(coordinate)
    }
}

impl From<NodeKey> for Coordinate {
    #[inline]
    fn from(key: NodeKey) -> Self {
        key.coordinate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn packs_height_above_width() {
        assert_eq!(NodeKey::new(0, 0).unwrap().get(), 0x0000_0000_0000_0000);
        assert_eq!(NodeKey::new(1, 0).unwrap().get(), 0x0100_0000_0000_0000);
        assert_eq!(NodeKey::new(0, 1).unwrap().get(), 0x0000_0000_0000_0001);
        assert_eq!(NodeKey::new(1, 1).unwrap().get(), 0x0100_0000_0000_0001);
        assert_eq!(NodeKey::new(0x77, 0xff00ff).unwrap().get(), 0x7700_0000_00ff_00ff);
        assert_eq!(NodeKey::new(0xff, MAX_WIDTH - 1).unwrap().get(), u64::MAX);
        assert_eq!(NodeKey::new(0, MAX_WIDTH - 1).unwrap().get(), 0x00ff_ffff_ffff_ffff);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            NodeKey::new(256, 0),
            Err(MerkleTreeError::CoordinateOutOfRange { height: 256, width: 0 })
        );
        assert_eq!(
            NodeKey::new(0, MAX_WIDTH),
            Err(MerkleTreeError::CoordinateOutOfRange { height: 0, width: MAX_WIDTH })
        );
        // The 24-bit width limit of a 32-bit key no longer applies.
        assert!(NodeKey::new(0, 1 << 24).is_ok());
    }

    #[test]
    fn unpacks_coordinate() {
        let coordinate = Coordinate::new(3, 0x00ab_cdef_0123);
        let key = NodeKey::try_from(coordinate).unwrap();
        assert_eq!(key.height(), 3);
        assert_eq!(key.width(), 0x00ab_cdef_0123);
        assert_eq!(Coordinate::from(key), coordinate);
        assert_eq!(*key, (3 << WIDTH_BITS) | 0x00ab_cdef_0123);
    }

    #[test]
    fn coordinate_navigation() {
        let node = Coordinate::new(2, 3);
        assert_eq!(node.parent(), Coordinate::new(3, 1));
        assert_eq!(node.children(), Some((Coordinate::new(1, 6), Coordinate::new(1, 7))));
        assert_eq!(node.left_neighbour(), Some(Coordinate::new(2, 2)));
        assert_eq!(Coordinate::leaf(5).children(), None);
        assert_eq!(Coordinate::new(4, 0).left_neighbour(), None);
    }

    #[test]
    fn coordinate_display() {
        assert_eq!(Coordinate::new(1, 42).to_string(), "(1, 42)");
    }
}
