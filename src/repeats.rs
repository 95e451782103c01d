//! Repeat-count inputs and their validation.

use std::borrow::Cow;

use crate::{RepeatError, Result};

/// Borrowed repeat counts together with the shape of the tensor that carried them.
///
/// The engine only expands along one axis, so a valid shape is either `[n]`
/// or, where broadcasting applies, `[]` / `[1]`.
#[derive(Debug, Clone)]
pub struct Repeats<'a> {
    counts: &'a [i64],
    dims: Vec<usize>,
}

impl<'a> Repeats<'a> {
    /// Wrap counts with an explicit shape. Nothing is checked here.
    pub fn new(counts: &'a [i64], dims: &[usize]) -> Self {
        Self {
            counts,
            dims: dims.to_vec(),
        }
    }

    /// Rank-1 counts, one per source record.
    pub fn from_slice(counts: &'a [i64]) -> Self {
        Self {
            counts,
            dims: vec![counts.len()],
        }
    }

    /// A rank-0 count applied to every source record.
    pub fn scalar(count: &'a i64) -> Self {
        Self {
            counts: std::slice::from_ref(count),
            dims: Vec::new(),
        }
    }

    pub fn counts(&self) -> &'a [i64] {
        self.counts
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Resolve these repeats against `len` source records.
    ///
    /// A scalar, or a vector holding a single count, is broadcast to `len`
    /// copies. Any other vector must already have `len` entries. Counts are
    /// validated (rank 1, non-negative) before any broadcast copy is made.
    pub fn expand_to(&self, len: usize) -> Result<Cow<'a, [i64]>> {
        match self.dims.as_slice() {
            [] | [1] => {
                validate_repeats(&[1], self.counts)?;
                if len == 1 {
                    Ok(Cow::Borrowed(self.counts))
                } else {
                    Ok(Cow::Owned(vec![self.counts[0]; len]))
                }
            }
            [n] => {
                if *n != len {
                    return Err(RepeatError::LengthMismatch {
                        expected: len,
                        found: *n,
                    });
                }
                validate_repeats(&[*n], self.counts)?;
                Ok(Cow::Borrowed(self.counts))
            }
            dims => Err(RepeatError::InvalidShape { rank: dims.len() }),
        }
    }
}

/// Check that `counts` is a rank-1 vector of non-negative values.
///
/// Scans every element; the first negative entry is reported.
pub fn validate_repeats(dims: &[usize], counts: &[i64]) -> Result<()> {
    if dims.len() != 1 {
        return Err(RepeatError::InvalidShape { rank: dims.len() });
    }
    if dims[0] != counts.len() {
        return Err(RepeatError::LengthMismatch {
            expected: dims[0],
            found: counts.len(),
        });
    }
    if let Some((index, &value)) = counts.iter().enumerate().find(|(_, c)| **c < 0) {
        return Err(RepeatError::NegativeRepeatCount { index, value });
    }
    Ok(())
}
