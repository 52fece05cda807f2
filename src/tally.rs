//! Combinable values and the quadrant tally
//!
//! The engine is generic over a commutative-enough algebra: any type with
//! an identity element and an associative `combine`. Only associativity is
//! required for correctness; the quadrant tally happens to be commutative
//! as well.

use crate::observation::Observation;

/// A monoid element the engine can reduce and scan over
///
/// Laws the engine relies on:
/// - `combine` is associative: `a.combine(&b).combine(&c) ==
///   a.combine(&b.combine(&c))`
/// - `identity` is neutral: `a.combine(&identity()) == a`
/// - `combine` is pure: neither operand is mutated. Sibling tasks read
///   shared interior values while others are still combining, so an
///   in-place `combine` would race.
pub trait Combinable: Clone + PartialEq + Send + Sync {
    /// The raw input type a leaf value is derived from.
    type Source: Sync;

    /// The neutral element of the monoid.
    fn identity() -> Self;

    /// Deterministic mapping from one raw input to a leaf value.
    fn from_source(source: &Self::Source) -> Self;

    /// Associative combination of two values.
    #[must_use]
    fn combine(&self, other: &Self) -> Self;
}

/// Grid dimension of the quadrant tally
pub const DIM: usize = 2;

/// 2×2 matrix of bucket counts, one cell per sign quadrant of `(x, y)`
///
/// Forms a commutative monoid under element-wise addition with the all-zero
/// matrix as identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadrantTally {
    counts: [[u64; DIM]; DIM],
}

impl QuadrantTally {
    /// Read one cell of the count matrix.
    #[inline]
    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.counts[row][col]
    }

    /// Total number of observations tallied.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// The full count matrix, row-major.
    pub fn counts(&self) -> [[u64; DIM]; DIM] {
        self.counts
    }
}

impl Combinable for QuadrantTally {
    type Source = Observation;

    fn identity() -> Self {
        Self {
            counts: [[0; DIM]; DIM],
        }
    }

    /// Bucket an observation by the signs of its coordinates:
    /// row 0 holds y >= 0, row 1 holds y < 0; column 0 holds x < 0,
    /// column 1 holds x >= 0.
    fn from_source(source: &Observation) -> Self {
        let row = if source.y < 0.0 { 1 } else { 0 };
        let col = if source.x < 0.0 { 0 } else { 1 };

        let mut tally = Self::identity();
        tally.counts[row][col] = 1;
        tally
    }

    fn combine(&self, other: &Self) -> Self {
        let mut counts = [[0; DIM]; DIM];
        for (r, row) in counts.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = self.counts[r][c] + other.counts[r][c];
            }
        }
        Self { counts }
    }
}

impl std::fmt::Display for QuadrantTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.counts {
            writeln!(f, "[{}, {}]", row[0], row[1])?;
        }
        Ok(())
    }
}
