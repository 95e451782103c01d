//! Parallel expansion executors.
//!
//! [`execute_sharded`] fills fixed-width output shards from a [`ShardPlan`];
//! [`execute_per_source`] gives every source record its own task. Both write
//! only to disjoint output ranges and read only shared immutable inputs, so
//! no locking is involved.

use crate::cumsum::CumulativeSums;
use crate::kernel::{fill_run, record};
use crate::plan::ShardPlan;
use crate::threading::{for_each_chunk_mut, for_each_index, SendPtr};

fn check_buffers(src: &[u8], elem_size: usize, cumsum: &CumulativeSums, dst: &[u8]) {
    assert!(elem_size > 0, "element size must be positive");
    assert_eq!(
        src.len(),
        cumsum.len() * elem_size,
        "source length does not match repeat counts"
    );
    assert_eq!(
        dst.len(),
        cumsum.total() * elem_size,
        "destination length does not match total repeats"
    );
}

/// Fill every shard of `dst` concurrently.
///
/// `src` holds `cumsum.len()` records of `elem_size` bytes and `dst` must be
/// exactly `cumsum.total() * elem_size` bytes. Output is identical for any
/// shard width and thread count.
///
/// # Panics
/// Panics on buffer length mismatches or if `plan` was not built from
/// `cumsum`.
pub fn execute_sharded(
    src: &[u8],
    elem_size: usize,
    cumsum: &CumulativeSums,
    plan: &ShardPlan,
    dst: &mut [u8],
) {
    check_buffers(src, elem_size, cumsum, dst);
    assert_eq!(plan.total, cumsum.total(), "plan does not match cumulative sums");
    if dst.is_empty() {
        return;
    }

    // A shard never spans more than the whole output, so the byte width is
    // bounded by `dst.len()` even for very large configured widths.
    let width = plan.shard_width.min(plan.total);
    let shard_bytes = width * elem_size;
    for_each_chunk_mut(dst, shard_bytes, |s, shard| {
        fill_shard(s, shard, src, elem_size, cumsum, plan);
    });
}

/// Fill one shard window, starting from the record the plan recorded for it.
fn fill_shard(
    s: usize,
    shard: &mut [u8],
    src: &[u8],
    elem_size: usize,
    cumsum: &CumulativeSums,
    plan: &ShardPlan,
) {
    let start = s * plan.shard_width;
    debug_assert_eq!(shard.len(), plan.shard_len(s) * elem_size);

    let mut cursor = plan.boundary(s);
    let end = cumsum.end(cursor);
    assert!(
        end >= start,
        "shard {s} starts at {start} but boundary record {cursor} ends at {end}"
    );
    let mut remaining = end - start;

    let mut out = shard;
    while !out.is_empty() {
        // Zero counts own no output; a shard may also begin on one (shard 0).
        while remaining == 0 {
            cursor += 1;
            remaining = cumsum.count(cursor);
        }
        let run = remaining.min(out.len() / elem_size);
        let (head, tail) = std::mem::take(&mut out).split_at_mut(run * elem_size);
        fill_run(head, record(src, elem_size, cursor));
        remaining -= run;
        out = tail;
    }
}

/// Fill `dst` with one task per source record.
///
/// Needs no plan, but a single large count keeps one worker busy while the
/// others idle; prefer [`execute_sharded`] for skewed counts.
///
/// # Panics
/// Panics on buffer length mismatches.
pub fn execute_per_source(src: &[u8], elem_size: usize, cumsum: &CumulativeSums, dst: &mut [u8]) {
    check_buffers(src, elem_size, cumsum, dst);

    let dst_ptr = SendPtr(dst.as_mut_ptr());
    for_each_index(cumsum.len(), |i| {
        let range = cumsum.range(i);
        if range.is_empty() {
            return;
        }
        // SAFETY: prefix sums are monotonic, so record ranges are disjoint and
        // lie inside `dst`, which outlives this loop.
        let out = unsafe {
            std::slice::from_raw_parts_mut(
                dst_ptr.as_ptr().add(range.start * elem_size),
                range.len() * elem_size,
            )
        };
        fill_run(out, record(src, elem_size, i));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cumsum::cumulative_sums;
    use crate::naive::execute_naive;
    use crate::plan::plan_shards;

    fn sharded(src: &[u8], elem_size: usize, counts: &[i64], width: usize) -> Vec<u8> {
        let cs = cumulative_sums(counts).unwrap();
        let plan = plan_shards(&cs, width);
        let mut dst = vec![0u8; cs.total() * elem_size];
        execute_sharded(src, elem_size, &cs, &plan, &mut dst);
        dst
    }

    fn per_source(src: &[u8], elem_size: usize, counts: &[i64]) -> Vec<u8> {
        let cs = cumulative_sums(counts).unwrap();
        let mut dst = vec![0u8; cs.total() * elem_size];
        execute_per_source(src, elem_size, &cs, &mut dst);
        dst
    }

    #[test]
    fn test_sharded_leading_zero() {
        assert_eq!(sharded(&[0, 1, 2], 1, &[0, 2, 3], 4), vec![1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_sharded_zero_in_middle() {
        assert_eq!(
            sharded(&[0, 1, 2], 1, &[3, 0, 5], 4),
            vec![0, 0, 0, 2, 2, 2, 2, 2]
        );
    }

    #[test]
    fn test_sharded_single_record_many_shards() {
        assert_eq!(sharded(&[0], 1, &[5], 2), vec![0; 5]);
    }

    #[test]
    fn test_sharded_trailing_zeros_and_exact_fill() {
        let src = [9u8, 8, 7, 6];
        assert_eq!(
            sharded(&src, 1, &[2, 2, 0, 0], 2),
            vec![9, 9, 8, 8]
        );
        assert_eq!(
            sharded(&src, 1, &[0, 0, 4, 0], 2),
            vec![7, 7, 7, 7]
        );
    }

    #[test]
    fn test_sharded_empty() {
        assert!(sharded(&[], 4, &[], 8).is_empty());
        assert!(sharded(&[1, 2, 3, 4], 4, &[0], 8).is_empty());
    }

    #[test]
    fn test_sharded_wide_records() {
        let src: Vec<u8> = (0..36).collect();
        let counts = [1, 0, 3];
        let out = sharded(&src, 12, &counts, 2);
        let expected: Vec<u8> = src[..12]
            .iter()
            .chain(src[24..].iter().cycle().take(36))
            .copied()
            .collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_sharded_matches_naive_all_widths() {
        let counts = [0, 3, 1, 0, 0, 9, 2, 0, 4, 1, 17, 0];
        let src: Vec<u8> = (0..counts.len() as u8 * 2).collect();
        let cs = cumulative_sums(&counts).unwrap();
        let mut expected = vec![0u8; cs.total() * 2];
        execute_naive(&src, 2, &cs, &mut expected);

        for width in 1..=40 {
            assert_eq!(sharded(&src, 2, &counts, width), expected, "width {width}");
        }
    }

    #[test]
    fn test_sharded_width_larger_than_output() {
        let src = [1u8, 0, 2, 0];
        let expected = vec![1, 0, 1, 0, 2, 0, 2, 0, 2, 0];
        for width in [6, 1 << 20, 1usize << (usize::BITS - 1), usize::MAX] {
            assert_eq!(sharded(&src, 2, &[2, 3], width), expected, "width {width}");
        }
    }

    #[test]
    fn test_per_source_matches_naive() {
        let counts = [0, 3, 1, 0, 0, 9, 2, 0, 4, 1, 17, 0];
        let src: Vec<u8> = (0..counts.len() as u8 * 4).collect();
        let cs = cumulative_sums(&counts).unwrap();
        let mut expected = vec![0u8; cs.total() * 4];
        execute_naive(&src, 4, &cs, &mut expected);
        assert_eq!(per_source(&src, 4, &counts), expected);
    }

    #[test]
    #[should_panic(expected = "destination length")]
    fn test_wrong_destination_length_panics() {
        let cs = cumulative_sums(&[2]).unwrap();
        let plan = plan_shards(&cs, 4);
        let mut dst = vec![0u8; 3];
        execute_sharded(&[1], 1, &cs, &plan, &mut dst);
    }
}
