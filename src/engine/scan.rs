//! Top-down prefix pass
//!
//! Each task carries a `prior` accumulator: the combination of every leaf
//! to the left of its subtree. At a fork the left child inherits `prior`
//! unchanged and the right child gets `prior` extended by the left
//! subtree's total, read in O(1) from the interior storage the reduction
//! pass filled. The output array is split at the leaf midpoint, so sibling
//! tasks write disjoint slices and need no locking.

use crate::tally::Combinable;
use crate::tree::TreeStorage;

/// Scan the subtree rooted at `i` into `out`, which must be exactly that
/// subtree's slice of the output array.
pub(super) fn scan_node<C: Combinable>(
    storage: &TreeStorage<C>,
    i: usize,
    prior: C,
    out: &mut [C],
    threshold: usize,
) {
    let shape = *storage.shape();
    debug_assert_eq!(out.len(), shape.count_leaves(i));

    if out.len() <= threshold {
        schwartz_scan(storage, i, prior, out);
        return;
    }

    let left = shape.left(i);
    let (left_out, right_out) = out.split_at_mut(out.len() / 2);
    let right_prior = prior.combine(&storage.value(left));

    rayon::join(
        || scan_node(storage, left, prior, left_out, threshold),
        || scan_node(storage, shape.right(i), right_prior, right_out, threshold),
    );
}

/// Flat sequential prefix fold over the leaf range of subtree `i`.
///
/// Leaves are visited in strictly increasing index order; the running
/// accumulator starts from `prior`, so each slot receives the inclusive
/// prefix of the whole input, not just of this block.
fn schwartz_scan<C: Combinable>(storage: &TreeStorage<C>, i: usize, prior: C, out: &mut [C]) {
    let shape = storage.shape();
    let leftmost = shape.leftmost_leaf(i);
    let rightmost = shape.rightmost_leaf(i);

    let mut acc = prior;
    for (slot, j) in out.iter_mut().zip(leftmost..=rightmost) {
        acc = acc.combine(&storage.leaf_value(j));
        *slot = acc.clone();
    }
}
