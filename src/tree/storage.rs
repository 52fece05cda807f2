//! Flat tree-addressed value storage
//!
//! Interior totals live in exactly N−1 slots, one per interior node, each
//! a `OnceLock` written a single time by the reduction pass. Leaf values
//! are never stored; they are recomputed from the source observation on
//! every read, which keeps the arrays allocation-free beyond the interior.

use std::fmt;
use std::sync::OnceLock;

use crate::tally::Combinable;
use crate::tree::TreeShape;
use crate::ScanError;

/// Tree-indexed storage for one engine instance
///
/// Concurrency contract: during a single pass, the reduction tasks write
/// disjoint interior slots (one per subtree root), so the only
/// synchronization is the once-only publication each `OnceLock` provides.
/// Reading an interior slot before the reduction pass has set it is a
/// violation of the pass ordering and panics.
pub struct TreeStorage<C: Combinable> {
    shape: TreeShape,
    sources: Vec<C::Source>,
    interior: Box<[OnceLock<C>]>,
}

impl<C: Combinable> TreeStorage<C> {
    /// Build storage over `sources`; fails unless the input length is a
    /// power of two.
    pub fn new(sources: Vec<C::Source>) -> Result<Self, ScanError> {
        let shape = TreeShape::new(sources.len())?;
        let interior = (0..shape.interior_len())
            .map(|_| OnceLock::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self {
            shape,
            sources,
            interior,
        })
    }

    /// The tree shape this storage is addressed by.
    #[inline]
    pub fn shape(&self) -> &TreeShape {
        &self.shape
    }

    /// The raw input sequence.
    pub fn sources(&self) -> &[C::Source] {
        &self.sources
    }

    /// Value of node `i`: the memoized subtree total for an interior node,
    /// or the mapped source for a leaf.
    pub fn value(&self, i: usize) -> C {
        if self.shape.is_leaf(i) {
            self.leaf_value(i)
        } else {
            self.interior[i]
                .get()
                .expect("interior value read before reduction pass")
                .clone()
        }
    }

    /// Leaf value at tree index `i`, computed on demand.
    #[inline]
    pub fn leaf_value(&self, i: usize) -> C {
        C::from_source(&self.sources[self.shape.leaf_output_index(i)])
    }

    /// Publish interior node `i`'s subtree total. Later writes to an
    /// already-set slot are ignored; a duplicate reduction of the same
    /// subtree recomputes the identical value.
    pub fn set_interior(&self, i: usize, value: C) {
        let _ = self.interior[i].set(value);
    }

    /// Whether the reduction pass has published the root total.
    pub fn root_is_set(&self) -> bool {
        match self.interior.first() {
            Some(slot) => slot.get().is_some(),
            // N = 1: no interior nodes, the root is the lone leaf
            None => true,
        }
    }
}

// Manual impl: `C::Source` need not be Debug
impl<C: Combinable> fmt::Debug for TreeStorage<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStorage")
            .field("shape", &self.shape)
            .field("root_is_set", &self.root_is_set())
            .finish_non_exhaustive()
    }
}
