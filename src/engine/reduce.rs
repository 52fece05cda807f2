//! Bottom-up reduction pass
//!
//! Subtrees at or below the cutoff run the flat Schwartz loop: a plain
//! left-to-right fold over their leaf range. Larger subtrees fork their
//! two children and combine the totals at the join point. Every visited
//! subtree root publishes its total into the interior storage so the scan
//! pass can read it in O(1).

use crate::tally::Combinable;
use crate::tree::TreeStorage;

/// Reduce the subtree rooted at `i`, publishing its total, and return it.
pub(super) fn reduce_node<C: Combinable>(
    storage: &TreeStorage<C>,
    i: usize,
    threshold: usize,
) -> C {
    let shape = *storage.shape();

    if shape.count_leaves(i) <= threshold {
        let total = schwartz_reduce(storage, i);
        if !shape.is_leaf(i) {
            storage.set_interior(i, total.clone());
        }
        return total;
    }

    let (left, right) = rayon::join(
        || reduce_node(storage, shape.left(i), threshold),
        || reduce_node(storage, shape.right(i), threshold),
    );
    let total = left.combine(&right);
    storage.set_interior(i, total.clone());
    total
}

/// Flat sequential fold over the leaf range of subtree `i`.
fn schwartz_reduce<C: Combinable>(storage: &TreeStorage<C>, i: usize) -> C {
    let shape = storage.shape();
    let rightmost = shape.rightmost_leaf(i);

    let mut total = C::identity();
    for j in shape.leftmost_leaf(i)..=rightmost {
        total = total.combine(&storage.leaf_value(j));
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Observation;
    use crate::tally::QuadrantTally;

    fn one_per_quadrant() -> Vec<Observation> {
        vec![
            Observation::new(0, -1.0, -1.0),
            Observation::new(1, 1.0, 1.0),
            Observation::new(2, -1.0, 1.0),
            Observation::new(3, 1.0, -1.0),
        ]
    }

    #[test]
    fn test_reduce_publishes_interior_totals() {
        let storage = TreeStorage::<QuadrantTally>::new(one_per_quadrant()).unwrap();
        // Threshold 1 forces forks all the way down to the leaves
        let root = reduce_node(&storage, 0, 1);

        assert_eq!(root.counts(), [[1, 1], [1, 1]]);
        assert_eq!(storage.value(0), root);
        // Sibling subtrees saw two observations each
        assert_eq!(storage.value(1).total(), 2);
        assert_eq!(storage.value(2).total(), 2);
    }

    #[test]
    fn test_cutoff_and_forked_paths_agree() {
        let storage = TreeStorage::<QuadrantTally>::new(one_per_quadrant()).unwrap();
        let forked = reduce_node(&storage, 0, 1);

        let storage2 = TreeStorage::<QuadrantTally>::new(one_per_quadrant()).unwrap();
        let flat = reduce_node(&storage2, 0, 64);

        assert_eq!(forked, flat);
    }
}
