//! Shard planning over the output index space.
//!
//! The output is cut into fixed-width shards. For each shard the planner
//! records the source record whose repetitions begin (or continue into) it,
//! which is all a worker needs to fill that shard on its own.

use std::ops::Range;

use crate::cumsum::CumulativeSums;

/// Boundary table for fixed-width output shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    /// Records per shard (the last shard may be shorter).
    pub shard_width: usize,
    /// Total output length in records.
    pub total: usize,
    /// `boundaries[s]` is the first source record written into shard `s`.
    pub boundaries: Vec<usize>,
}

impl ShardPlan {
    pub fn num_shards(&self) -> usize {
        self.boundaries.len()
    }

    /// Source record that shard `s` starts copying from.
    #[inline]
    pub fn boundary(&self, s: usize) -> usize {
        self.boundaries[s]
    }

    /// Output positions owned by shard `s`.
    #[inline]
    pub fn shard_range(&self, s: usize) -> Range<usize> {
        let start = s * self.shard_width;
        start..start.saturating_add(self.shard_width).min(self.total)
    }

    /// Number of records shard `s` writes.
    #[inline]
    pub fn shard_len(&self, s: usize) -> usize {
        let r = self.shard_range(s);
        r.end - r.start
    }
}

/// Build the shard boundary table in one forward pass over the counts.
///
/// Runs in O(N + num_shards): a count spanning several shards advances the
/// shard cursor once per shard it crosses, and many small counts share one
/// shard. The result depends only on the inputs.
///
/// # Panics
/// Panics if `shard_width` is zero.
pub fn plan_shards(cumsum: &CumulativeSums, shard_width: usize) -> ShardPlan {
    assert!(shard_width > 0, "shard width must be positive");

    let total = cumsum.total();
    let num_shards = total.div_ceil(shard_width);
    let mut boundaries = vec![0usize; num_shards];

    let mut current_shard = 0usize;
    let mut capacity = shard_width;
    for (i, mut count) in cumsum.counts().enumerate() {
        while count > capacity {
            count -= capacity;
            capacity = shard_width;
            current_shard += 1;
            boundaries[current_shard] = i;
        }
        capacity -= count;
    }

    tracing::debug!(total, shard_width, num_shards, "planned output shards");
    ShardPlan {
        shard_width,
        total,
        boundaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cumsum::cumulative_sums;

    fn plan(counts: &[i64], width: usize) -> ShardPlan {
        plan_shards(&cumulative_sums(counts).unwrap(), width)
    }

    #[test]
    fn test_single_count_spans_shards() {
        let p = plan(&[5], 2);
        assert_eq!(p.boundaries, vec![0, 0, 0]);
        let lens: Vec<usize> = (0..p.num_shards()).map(|s| p.shard_len(s)).collect();
        assert_eq!(lens, vec![2, 2, 1]);
    }

    #[test]
    fn test_zero_between_elements() {
        // Shard 0 holds 0,0,0 then starts record 2; shard 1 continues record 2.
        let p = plan(&[3, 0, 5], 4);
        assert_eq!(p.boundaries, vec![0, 2]);
        assert_eq!(p.shard_range(1), 4..8);
    }

    #[test]
    fn test_leading_zero() {
        let p = plan(&[0, 2, 3], 4);
        assert_eq!(p.boundaries, vec![0, 2]);
    }

    #[test]
    fn test_empty() {
        let p = plan(&[], 4);
        assert_eq!(p.num_shards(), 0);
        assert_eq!(p.total, 0);

        let p = plan(&[0, 0], 4);
        assert_eq!(p.num_shards(), 0);
    }

    #[test]
    fn test_exact_fill_starts_next_record() {
        // Record 0 fills shard 0 exactly, so shard 1 begins at record 1.
        let p = plan(&[4, 1, 4], 4);
        assert_eq!(p.boundaries, vec![0, 1, 2]);
    }

    #[test]
    fn test_many_small_counts_share_a_shard() {
        let p = plan(&[1; 10], 4);
        assert_eq!(p.boundaries, vec![0, 4, 8]);
        assert_eq!(p.shard_len(2), 2);
    }

    #[test]
    fn test_boundaries_monotonic_and_pure() {
        let counts = [0, 7, 1, 0, 0, 13, 2, 2, 0, 40, 1];
        let a = plan(&counts, 3);
        let b = plan(&counts, 3);
        assert_eq!(a, b);
        assert_eq!(a.boundaries[0], 0);
        assert!(a.boundaries.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_boundary_owns_shard_start() {
        let counts = [2, 0, 9, 1, 0, 3, 17, 0, 5];
        let cs = cumulative_sums(&counts).unwrap();
        for width in 1..8 {
            let p = plan_shards(&cs, width);
            for s in 0..p.num_shards() {
                let start = p.shard_range(s).start;
                let b = p.boundary(s);
                assert!(cs.end(b) >= start);
                if s > 0 {
                    assert!(cs.range(b).contains(&start));
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "shard width must be positive")]
    fn test_zero_width_panics() {
        plan(&[1], 0);
    }
}
