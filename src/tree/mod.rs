//! Implicit binary tree indexing and storage
//!
//! The tree is never materialized as nodes. A perfect binary tree over
//! N = 2^h leaves is addressed as one logical array of 2N−1 slots:
//! index 0 is the root, node i's children are 2i+1 and 2i+2, and the last
//! N slots are the leaves in left-to-right order. All navigation is index
//! arithmetic.

mod storage;

pub use storage::TreeStorage;

use crate::ScanError;

/// Index arithmetic over a perfect binary tree with `leaves` = 2^h leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeShape {
    leaves: usize,
}

impl TreeShape {
    /// Create the shape for `leaves` leaf positions.
    ///
    /// Fails with [`ScanError::InvalidInputSize`] unless `leaves` is a
    /// power of two; every internal node of a perfect tree has exactly two
    /// children and equal-sized subtrees, which the passes rely on.
    pub fn new(leaves: usize) -> Result<Self, ScanError> {
        if leaves == 0 || !leaves.is_power_of_two() {
            return Err(ScanError::InvalidInputSize(leaves));
        }
        Ok(Self { leaves })
    }

    /// Number of leaf positions N.
    #[inline]
    pub fn leaves(&self) -> usize {
        self.leaves
    }

    /// Number of interior nodes, N − 1.
    #[inline]
    pub fn interior_len(&self) -> usize {
        self.leaves - 1
    }

    /// Total logical array size, 2N − 1.
    #[inline]
    pub fn size(&self) -> usize {
        2 * self.leaves - 1
    }

    /// Tree height h = log2(N).
    pub fn height(&self) -> u32 {
        self.leaves.trailing_zeros()
    }

    /// Parent of node `i`. Undefined for the root (index 0).
    #[inline]
    pub fn parent(&self, i: usize) -> usize {
        (i - 1) / 2
    }

    /// Left child of node `i`.
    #[inline]
    pub fn left(&self, i: usize) -> usize {
        2 * i + 1
    }

    /// Right child of node `i`.
    #[inline]
    pub fn right(&self, i: usize) -> usize {
        self.left(i) + 1
    }

    /// A node is a leaf iff its right child index falls off the array.
    #[inline]
    pub fn is_leaf(&self, i: usize) -> bool {
        self.right(i) >= self.size()
    }

    /// Leftmost leaf of the subtree rooted at `i`, found by descending
    /// left children. Bounds the sequential loop for that subtree.
    pub fn leftmost_leaf(&self, mut i: usize) -> usize {
        while !self.is_leaf(i) {
            i = self.left(i);
        }
        i
    }

    /// Rightmost leaf of the subtree rooted at `i`.
    pub fn rightmost_leaf(&self, mut i: usize) -> usize {
        while !self.is_leaf(i) {
            i = self.right(i);
        }
        i
    }

    /// Number of leaves under node `i`. Recomputed per call; it is only
    /// evaluated at the cutoff boundary, so no caching is needed.
    pub fn count_leaves(&self, i: usize) -> usize {
        if self.is_leaf(i) {
            1
        } else {
            self.count_leaves(self.left(i)) + self.count_leaves(self.right(i))
        }
    }

    /// Translate a leaf's tree index into its input/output position.
    #[inline]
    pub fn leaf_output_index(&self, i: usize) -> usize {
        debug_assert!(self.is_leaf(i), "node {i} is interior");
        i - self.interior_len()
    }
}
