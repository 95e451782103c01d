//! Execution configuration.

use crate::{RepeatError, Result, DEFAULT_SHARD_WIDTH, MIN_PARALLEL_LEN};

/// Which executor fills the output.
///
/// All strategies produce byte-identical output; they differ only in cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// `Naive` for small outputs, `Sharded` otherwise.
    #[default]
    Auto,
    /// Single-threaded loop over source records.
    Naive,
    /// Fixed-width output shards filled in parallel. Balanced for any
    /// distribution of counts, at the cost of an O(N) planning pass.
    Sharded,
    /// One task per source record. No planning, but a single huge count
    /// serializes on one worker.
    PerSource,
    /// Materialize the expanded index vector, then gather records by index.
    /// Balanced, but allocates `total` indices alongside the output.
    Gather,
}

/// Knobs for an expansion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatConfig {
    /// Output records per shard for [`Strategy::Sharded`].
    pub shard_width: usize,
    pub strategy: Strategy,
    /// Run on a dedicated pool of this many threads instead of the global one.
    pub num_threads: Option<usize>,
    /// Output length below which [`Strategy::Auto`] stays sequential.
    pub min_parallel_len: usize,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            shard_width: DEFAULT_SHARD_WIDTH,
            strategy: Strategy::Auto,
            num_threads: None,
            min_parallel_len: MIN_PARALLEL_LEN,
        }
    }
}

impl RepeatConfig {
    pub fn with_shard_width(mut self, shard_width: usize) -> Self {
        self.shard_width = shard_width;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn with_min_parallel_len(mut self, min_parallel_len: usize) -> Self {
        self.min_parallel_len = min_parallel_len;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.shard_width == 0 {
            return Err(RepeatError::InvalidShardWidth);
        }
        Ok(())
    }

    /// Concrete strategy for an output of `total` records.
    pub fn resolve(&self, total: usize) -> Strategy {
        match self.strategy {
            Strategy::Auto if !cfg!(feature = "parallel") => Strategy::Naive,
            Strategy::Auto if total < self.min_parallel_len => Strategy::Naive,
            Strategy::Auto => Strategy::Sharded,
            s => s,
        }
    }
}
