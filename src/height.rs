/// Tracks how many leaves the tree spans and how many levels it needs for a single root.
///
/// Both values only ever grow. A tree over `width` leaves needs one level for the leaves plus
/// one level for every doubling up to the next power of two:
///
/// | width  | 0 | 1 | 2 | 3..=4 | 5..=8 | 9..=16 |
/// |--------|---|---|---|-------|-------|--------|
/// | height | 0 | 1 | 2 | 3     | 4     | 5      |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeHeight {
    max_width: u64,
    max_height: u8,
}

impl TreeHeight {
    /// Creates a tracker for an empty tree.
    #[inline]
    pub const fn new() -> Self {
        Self { max_width: 0, max_height: 0 }
    }

    /// Number of leaf positions spanned, i.e. the highest written index plus one.
    #[inline]
    pub const fn max_width(self) -> u64 {
        self.max_width
    }

    /// Number of levels including the leaf level.
    #[inline]
    pub const fn max_height(self) -> u8 {
        self.max_height
    }

    /// Level of the root node, or `None` if nothing was written yet.
    #[inline]
    pub const fn root_level(self) -> Option<u8> {
        self.max_height.checked_sub(1)
    }

    /// Extends the tracked width to `required_width`.
    ///
    /// Does nothing if the tree is already at least that wide. Returns `true` if the width grew.
    #[inline]
    pub fn grow_to(&mut self, required_width: u64) -> bool {
        if required_width <= self.max_width {
            return false;
        }
        self.max_width = required_width;
        self.max_height = levels_for(required_width);
        true
    }
}

/// Returns the number of levels needed to hang `width` leaves below a single root.
///
/// Equivalent to `floor(log2(width)) + 1` for powers of two and `floor(log2(width)) + 2`
/// otherwise, computed without floating point.
#[inline]
pub const fn levels_for(width: u64) -> u8 {
    if width == 0 {
        return 0;
    }
    // Bits needed to address `width` leaves, plus the leaf level.
    let bits = u64::BITS - (width - 1).leading_zeros();
    bits as u8 + 1
}
