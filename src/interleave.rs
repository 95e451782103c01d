//! Public entry points: validate, size, allocate, dispatch.
//!
//! Everything that can fail (shape, signs, overflow, pool construction) is
//! checked before the output buffer exists.

use bytemuck::Pod;

use crate::config::{RepeatConfig, Strategy};
use crate::cumsum::{cumulative_sums, CumulativeSums};
use crate::execute::{execute_per_source, execute_sharded};
use crate::indices::{execute_gather, fill_indices};
use crate::maybe_sync::MaybeSend;
use crate::naive::execute_naive;
use crate::plan::plan_shards;
use crate::repeats::{validate_repeats, Repeats};
use crate::threading::install;
use crate::{RepeatError, Result};

/// Repeat each element of `src` according to `repeats`.
///
/// `repeats` is either one count per element, a single-entry vector, or a
/// scalar; the latter two apply the same count to every element.
///
/// # Errors
/// - [`RepeatError::InvalidShape`] if `repeats` has rank 2 or more
/// - [`RepeatError::LengthMismatch`] if the counts do not match `src.len()`
/// - [`RepeatError::NegativeRepeatCount`] for any negative count
/// - [`RepeatError::SizeOverflow`] if the output would not fit in memory
/// - [`RepeatError::InvalidShardWidth`] for a zero shard width
/// - [`RepeatError::InvalidElementSize`] for zero-sized `T`
pub fn repeat_interleave<T>(
    src: &[T],
    repeats: &Repeats<'_>,
    config: &RepeatConfig,
) -> Result<Vec<T>>
where
    T: Pod + MaybeSend,
{
    let elem_size = std::mem::size_of::<T>();
    if elem_size == 0 {
        return Err(RepeatError::InvalidElementSize {
            elem_size,
            byte_len: 0,
        });
    }
    let cumsum = prepare(src.len(), elem_size, repeats, config)?;
    let src_bytes: &[u8] = bytemuck::cast_slice(src);

    install(config.num_threads, || {
        let mut out = vec![<T as bytemuck::Zeroable>::zeroed(); cumsum.total()];
        dispatch(
            src_bytes,
            elem_size,
            &cumsum,
            config,
            bytemuck::cast_slice_mut(&mut out[..]),
        );
        out
    })
}

/// Repeat fixed-width records stored back to back in `src`.
///
/// `src.len()` must be a multiple of `elem_size`; the output holds
/// `sum(repeats) * elem_size` bytes.
///
/// # Errors
/// As [`repeat_interleave`], plus [`RepeatError::InvalidElementSize`] when
/// `elem_size` is zero or does not divide `src.len()`.
pub fn repeat_interleave_bytes(
    src: &[u8],
    elem_size: usize,
    repeats: &Repeats<'_>,
    config: &RepeatConfig,
) -> Result<Vec<u8>> {
    if elem_size == 0 || src.len() % elem_size != 0 {
        return Err(RepeatError::InvalidElementSize {
            elem_size,
            byte_len: src.len(),
        });
    }
    let cumsum = prepare(src.len() / elem_size, elem_size, repeats, config)?;

    install(config.num_threads, || {
        let mut out = vec![0u8; cumsum.total() * elem_size];
        dispatch(src, elem_size, &cumsum, config, &mut out);
        out
    })
}

/// Expanded source indices: position `p` holds the record that owns it.
///
/// `[0, 2, 3]` gives `[1, 1, 2, 2, 2]`. Counts must be rank 1; there is no
/// element count to broadcast a scalar against.
///
/// Only the sequential/parallel split of the configured strategy applies:
/// `Naive` (or `Auto` on a small output) fills on the calling thread, and
/// every other strategy fills in parallel over source records. There is no
/// shard planning here, so a single huge count is written by one worker.
pub fn repeat_interleave_indices(
    repeats: &Repeats<'_>,
    config: &RepeatConfig,
) -> Result<Vec<usize>> {
    config.validate()?;
    validate_repeats(repeats.dims(), repeats.counts())?;
    let cumsum = cumulative_sums(repeats.counts())?;
    check_alloc(cumsum.total(), std::mem::size_of::<usize>())?;

    install(config.num_threads, || {
        let mut out = vec![0usize; cumsum.total()];
        if config.resolve(cumsum.total()) == Strategy::Naive {
            for i in 0..cumsum.len() {
                out[cumsum.range(i)].fill(i);
            }
        } else {
            fill_indices(&cumsum, &mut out);
        }
        out
    })
}

fn prepare(
    num_records: usize,
    elem_size: usize,
    repeats: &Repeats<'_>,
    config: &RepeatConfig,
) -> Result<CumulativeSums> {
    config.validate()?;
    let counts = repeats.expand_to(num_records)?;
    let cumsum = cumulative_sums(&counts)?;
    check_alloc(cumsum.total(), elem_size)?;
    if config.resolve(cumsum.total()) == Strategy::Gather {
        check_alloc(cumsum.total(), std::mem::size_of::<usize>())?;
    }
    Ok(cumsum)
}

/// Reject outputs whose byte size does not fit an allocation.
fn check_alloc(total: usize, elem_size: usize) -> Result<()> {
    match total.checked_mul(elem_size) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
        _ => Err(RepeatError::SizeOverflow),
    }
}

fn dispatch(
    src: &[u8],
    elem_size: usize,
    cumsum: &CumulativeSums,
    config: &RepeatConfig,
    dst: &mut [u8],
) {
    let total = cumsum.total();
    let strategy = config.resolve(total);
    tracing::debug!(?strategy, total, records = cumsum.len(), elem_size, "expanding");

    match strategy {
        Strategy::Naive => execute_naive(src, elem_size, cumsum, dst),
        Strategy::Auto | Strategy::Sharded => {
            let plan = plan_shards(cumsum, config.shard_width);
            execute_sharded(src, elem_size, cumsum, &plan, dst);
        }
        Strategy::PerSource => execute_per_source(src, elem_size, cumsum, dst),
        Strategy::Gather => {
            let mut indices = vec![0usize; total];
            fill_indices(cumsum, &mut indices);
            execute_gather(src, elem_size, &indices, dst);
        }
    }
}
