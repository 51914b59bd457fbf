//! Digest functions the tree can be built over.

use alloy_primitives::{B256, keccak256};
use core::fmt;

/// A deterministic digest function with a fixed output length.
///
/// Leaves are hashed from the raw block bytes; internal nodes are hashed from the concatenation
/// of their left and right child digests.
pub trait TreeHasher {
    /// The digest produced by [`hash`](Self::hash).
    type Digest: AsRef<[u8]> + Clone + fmt::Debug;

    /// Hashes `data`.
    fn hash(&self, data: &[u8]) -> Self::Digest;
}

impl<T: TreeHasher + ?Sized> TreeHasher for &T {
    type Digest = T::Digest;

    #[inline]
    fn hash(&self, data: &[u8]) -> Self::Digest {
        (**self).hash(data)
    }
}

/// Keccak-256, as used by Ethereum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keccak256;

impl TreeHasher for Keccak256 {
    type Digest = B256;

    #[inline]
    fn hash(&self, data: &[u8]) -> B256 {
        keccak256(data)
    }
}

/// SHA-256.
#[cfg(feature = "sha2")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256;

#[cfg(feature = "sha2")]
impl TreeHasher for Sha256 {
    type Digest = B256;

    #[inline]
    fn hash(&self, data: &[u8]) -> B256 {
        use sha2::Digest as _;
        B256::from_slice(&sha2::Sha256::digest(data))
    }
}

/// Adapts a plain function or closure into a [`TreeHasher`].
///
/// ```
/// use block_merkle::{FnHasher, TreeHasher};
///
/// let xor = FnHasher::new(|data: &[u8]| [data.iter().fold(0u8, |acc, b| acc ^ b)]);
/// assert_eq!(xor.hash(&[1, 2, 4]), [7]);
/// ```
#[derive(Clone, Copy)]
pub struct FnHasher<F>(F);

impl<F> fmt::Debug for FnHasher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnHasher").finish_non_exhaustive()
    }
}

impl<F> FnHasher<F> {
    /// Wraps `f`.
    #[inline]
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F, D> TreeHasher for FnHasher<F>
where
    F: Fn(&[u8]) -> D,
    D: AsRef<[u8]> + Clone + fmt::Debug,
{
    type Digest = D;

    #[inline]
    fn hash(&self, data: &[u8]) -> D {
        (self.0)(data)
    }
}
