//! Prefix sums over repeat counts.

use crate::{RepeatError, Result};

/// Inclusive prefix sums over repeat counts.
///
/// `ends[i]` is one past the last output position of source record `i`, so
/// record `i` owns the output range `start(i)..ends[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeSums {
    ends: Vec<usize>,
}

impl CumulativeSums {
    /// Number of source records.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Total output length (sum of all counts).
    #[inline]
    pub fn total(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Inclusive prefix sums, one per source record.
    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    /// First output position of record `i`.
    #[inline]
    pub fn start(&self, i: usize) -> usize {
        if i == 0 {
            0
        } else {
            self.ends[i - 1]
        }
    }

    /// One past the last output position of record `i`.
    #[inline]
    pub fn end(&self, i: usize) -> usize {
        self.ends[i]
    }

    /// Repeat count of record `i`.
    #[inline]
    pub fn count(&self, i: usize) -> usize {
        self.end(i) - self.start(i)
    }

    /// Output range of record `i`.
    #[inline]
    pub fn range(&self, i: usize) -> std::ops::Range<usize> {
        self.start(i)..self.end(i)
    }

    /// Repeat counts in source order.
    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        let mut prev = 0;
        self.ends.iter().map(move |&end| {
            let c = end - prev;
            prev = end;
            c
        })
    }
}

/// Build prefix sums in a single forward pass.
///
/// Counts must already be validated as non-negative. Returns
/// [`RepeatError::SizeOverflow`] if a count or a partial sum does not fit in
/// `usize`.
pub fn cumulative_sums(counts: &[i64]) -> Result<CumulativeSums> {
    let mut ends = Vec::with_capacity(counts.len());
    let mut total = 0usize;
    for &c in counts {
        let c = usize::try_from(c).map_err(|_| RepeatError::SizeOverflow)?;
        total = total.checked_add(c).ok_or(RepeatError::SizeOverflow)?;
        ends.push(total);
    }
    tracing::trace!(len = counts.len(), total, "built cumulative sums");
    Ok(CumulativeSums { ends })
}
