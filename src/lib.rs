//! Load-balanced parallel repeat-interleave.
//!
//! Given non-negative repeat counts over `N` source records, this crate
//! produces a flat output in which record `i` appears `repeats[i]`
//! consecutive times. Records are opaque fixed-width byte strings copied
//! verbatim; the typed API accepts any [`bytemuck::Pod`] element.
//!
//! # Pipeline
//!
//! ```text
//! validate -> cumulative sums -> shard plan -> parallel fill -> output
//! ```
//!
//! - [`validate_repeats`]: rank and sign checks, before any allocation
//! - [`cumulative_sums`]: prefix sums and the exact output length
//! - [`plan_shards`]: splits the *output* into fixed-width shards and records
//!   which source record each shard starts from
//! - [`execute_sharded`]: fills every shard independently on the rayon pool
//!
//! Because shards have a fixed width in the output space, a single huge
//! repeat count is spread over many workers instead of serializing one.
//!
//! # Strategies
//!
//! | [`Strategy`]  | Parallel over      | Planning | Skewed counts |
//! |---------------|--------------------|----------|---------------|
//! | `Naive`       | nothing            | none     | n/a           |
//! | `Sharded`     | output shards      | O(N)     | balanced      |
//! | `PerSource`   | source records     | none     | one worker per record |
//! | `Gather`      | output positions   | indices  | balanced, extra index buffer |
//!
//! `Auto` uses `Naive` below [`MIN_PARALLEL_LEN`] output records and
//! `Sharded` above it.
//!
//! # Example
//!
//! ```rust
//! use strided_repeat::{repeat_interleave, RepeatConfig, Repeats};
//!
//! let src = [10u32, 20, 30];
//! let counts = [0i64, 2, 3];
//! let out = repeat_interleave(&src, &Repeats::from_slice(&counts), &RepeatConfig::default())
//!     .unwrap();
//! assert_eq!(out, vec![20, 20, 30, 30, 30]);
//! ```

pub mod config;
pub mod cumsum;
pub mod execute;
pub mod indices;
mod interleave;
mod kernel;
mod maybe_sync;
pub mod naive;
pub mod plan;
pub mod repeats;
mod threading;

pub use config::{RepeatConfig, Strategy};
pub use cumsum::{cumulative_sums, CumulativeSums};
pub use execute::{execute_per_source, execute_sharded};
pub use indices::{execute_gather, fill_indices};
pub use interleave::{repeat_interleave, repeat_interleave_bytes, repeat_interleave_indices};
pub use maybe_sync::MaybeSend;
pub use naive::execute_naive;
pub use plan::{plan_shards, ShardPlan};
pub use repeats::{validate_repeats, Repeats};

// ============================================================================
// Constants
// ============================================================================

/// Default number of output records per shard.
///
/// Large enough that per-shard dispatch is amortized, small enough that a
/// few thousand shards exist for outputs in the millions of records.
pub const DEFAULT_SHARD_WIDTH: usize = 4096;

/// Output length (in records) below which `Strategy::Auto` stays sequential.
pub const MIN_PARALLEL_LEN: usize = 1 << 15;

// ============================================================================
// Error types
// ============================================================================

/// Errors raised while validating an expansion request.
///
/// Every variant is detected before the output buffer is allocated.
#[derive(Debug, thiserror::Error)]
pub enum RepeatError {
    /// Repeat counts must be a vector (rank 1), or a scalar where broadcasting applies.
    #[error("repeats must be a 1-D vector, got rank {rank}")]
    InvalidShape { rank: usize },

    /// A repeat count is negative.
    #[error("repeats can not be negative: repeats[{index}] = {value}")]
    NegativeRepeatCount { index: usize, value: i64 },

    /// The total output length does not fit in `usize`.
    #[error("output size overflow while accumulating repeat counts")]
    SizeOverflow,

    /// Number of repeat counts does not match what was expected.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Record width is zero or does not divide the source byte length.
    #[error("invalid element size {elem_size} for {byte_len} source bytes")]
    InvalidElementSize { elem_size: usize, byte_len: usize },

    /// Shard width must be positive.
    #[error("shard width must be positive")]
    InvalidShardWidth,

    /// A dedicated thread pool could not be built.
    #[cfg(feature = "parallel")]
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for expansion operations.
pub type Result<T> = std::result::Result<T, RepeatError>;
