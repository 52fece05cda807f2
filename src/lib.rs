//! # Work-Efficient Parallel Scan-with-Reduction
//!
//! Given an ordered sequence of N = 2^h observations, this library computes
//! (a) the associative combination of all of them (the *reduction*) and
//! (b) the combination of every prefix (the *scan*), using a Brent/Schwartz
//! divide-and-conquer over an implicit perfect binary tree on a
//! work-stealing fork/join pool.
//!
//! ## Core Algorithm
//!
//! 1. **Reduction pass** (bottom-up): subtrees at or below a cutoff
//!    threshold run a flat sequential fold; larger subtrees fork two
//!    sibling tasks and combine their totals. Interior totals are memoized.
//! 2. **Scan pass** (top-down): each task carries a "prior" accumulator.
//!    The right child's prior is extended by the left subtree's total,
//!    which the reduction pass already computed — O(1) per split, so the
//!    whole scan stays O(N) work at O(log N) depth.
//!
//! ## Usage Example
//!
//! ```
//! use heatscan::{Observation, QuadrantTally, ScanEngine};
//!
//! let obs = vec![
//!     Observation::new(0, -0.5, 0.5),
//!     Observation::new(1, 0.5, 0.5),
//!     Observation::new(2, -0.5, -0.5),
//!     Observation::new(3, 0.5, -0.5),
//! ];
//! let engine = ScanEngine::<QuadrantTally>::new(obs)?;
//! let total = engine.reduction()?;
//! let prefixes = engine.scan()?;
//! assert_eq!(prefixes.len(), 4);
//! assert_eq!(prefixes[3], total);
//! # Ok::<(), heatscan::ScanError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules - each implements one component of the engine
pub mod engine;      // Reduction and scan passes
pub mod observation; // Raw input events
pub mod scheduler;   // Fork/join worker pool
pub mod tally;       // Combinable values and the quadrant tally
pub mod tree;        // Implicit binary tree indexing and storage

// Re-exports for convenience
pub use engine::ScanEngine;
pub use observation::Observation;
pub use scheduler::WorkerPool;
pub use tally::{Combinable, QuadrantTally};
pub use tree::{TreeShape, TreeStorage};

use thiserror::Error;

/// Default cutoff: subtrees with at most this many leaves run the flat
/// sequential loop instead of forking further.
pub const DEFAULT_THRESHOLD: usize = 16;

/// Tuning parameters for a [`ScanEngine`]
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum leaf count of a subtree still processed sequentially.
    /// Correctness never depends on this value; it only bounds task
    /// overhead to O(N / threshold) forks.
    pub threshold: usize,

    /// Worker thread count for the fork/join pool. `None` lets the pool
    /// size itself to available hardware concurrency.
    pub workers: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            workers: None,
        }
    }
}

impl EngineConfig {
    /// Override the sequential cutoff threshold.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Pin the worker pool to an explicit thread count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
}

/// Errors surfaced by engine construction and the two passes
#[derive(Error, Debug)]
pub enum ScanError {
    /// Input length is not a power of two
    #[error("number of observations must be a power of two, got {0}")]
    InvalidInputSize(usize),

    /// Cutoff threshold of zero would never terminate the recursion
    #[error("threshold must be at least 1, got {0}")]
    InvalidThreshold(usize),

    /// The worker pool could not be constructed
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    /// A forked computation faulted; no partial result is valid
    #[error("parallel task failed: {0}")]
    TaskFailure(String),
}
