//! Reduction and scan passes
//!
//! The engine owns the tree storage, a shared worker pool, and the two
//! memoized results. Control flow: build from N = 2^h observations →
//! `reduction()` runs the bottom-up pass once and caches the root total →
//! `scan()` reuses the interior totals the reduction pass published to run
//! the top-down prefix pass once.

mod reduce;
mod scan;

use std::sync::OnceLock;

use tracing::debug;

use crate::scheduler::WorkerPool;
use crate::tally::Combinable;
use crate::tree::TreeStorage;
use crate::{EngineConfig, ScanError};

/// Index of the tree root in the logical node array.
const ROOT: usize = 0;

/// Parallel scan-with-reduction over one fixed input sequence
///
/// Both results are computed at most once per engine instance; repeat
/// calls return the cached value. The `OnceLock` publication doubles as
/// the `NotReduced → Reduced` transition, so a scan requested from any
/// thread observes the interior totals with acquire ordering.
#[derive(Debug)]
pub struct ScanEngine<C: Combinable> {
    storage: TreeStorage<C>,
    config: EngineConfig,
    pool: WorkerPool,
    reduction: OnceLock<C>,
    prefixes: OnceLock<Vec<C>>,
}

impl<C: Combinable> ScanEngine<C> {
    /// Build an engine over `sources` with the default configuration.
    ///
    /// Fails with [`ScanError::InvalidInputSize`] unless the input length
    /// is a power of two; no partially constructed engine is returned.
    pub fn new(sources: Vec<C::Source>) -> Result<Self, ScanError> {
        Self::with_config(sources, EngineConfig::default())
    }

    /// Build an engine with explicit tuning parameters.
    pub fn with_config(
        sources: Vec<C::Source>,
        config: EngineConfig,
    ) -> Result<Self, ScanError> {
        if config.threshold == 0 {
            return Err(ScanError::InvalidThreshold(0));
        }
        let storage = TreeStorage::new(sources)?;
        let pool = WorkerPool::new(config.workers)?;
        Ok(Self {
            storage,
            config,
            pool,
            reduction: OnceLock::new(),
            prefixes: OnceLock::new(),
        })
    }

    /// Number of observations N.
    pub fn len(&self) -> usize {
        self.storage.shape().leaves()
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Combination of the entire input sequence.
    ///
    /// The first call runs the bottom-up reduction pass; later calls
    /// return the cached root total without touching the pool.
    pub fn reduction(&self) -> Result<C, ScanError> {
        Ok(self.ensure_reduced()?.clone())
    }

    /// Inclusive prefix combinations in input order, length N.
    ///
    /// Runs the reduction pass first if it has not happened yet; the scan
    /// pass reads the left-subtree totals it published. The result is
    /// computed once and cached.
    pub fn scan(&self) -> Result<Vec<C>, ScanError> {
        if let Some(cached) = self.prefixes.get() {
            return Ok(cached.clone());
        }
        self.ensure_reduced()?;

        let n = self.len();
        let threshold = self.config.threshold;
        debug!(n, threshold, workers = self.pool.workers(), "scan pass");

        let mut output = vec![C::identity(); n];
        self.pool.invoke(|| {
            scan::scan_node(&self.storage, ROOT, C::identity(), &mut output, threshold)
        })?;

        Ok(self.prefixes.get_or_init(|| output).clone())
    }

    fn ensure_reduced(&self) -> Result<&C, ScanError> {
        if let Some(root) = self.reduction.get() {
            return Ok(root);
        }

        let threshold = self.config.threshold;
        debug!(
            n = self.len(),
            threshold,
            workers = self.pool.workers(),
            "reduction pass"
        );

        let root = self
            .pool
            .invoke(|| reduce::reduce_node(&self.storage, ROOT, threshold))?;

        // Two callers racing here both computed the same pure result; the
        // first publication wins and the duplicate is dropped.
        Ok(self.reduction.get_or_init(|| root))
    }
}
