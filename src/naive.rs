//! Sequential reference expansion.
//!
//! Used as the oracle in tests and as the fast path for outputs too small to
//! amortize thread-pool dispatch.

use crate::cumsum::CumulativeSums;
use crate::kernel::fill_run;

/// Write `count(i)` copies of record `i` for every `i`, in order, on the
/// calling thread.
///
/// # Panics
/// Panics if `src` or `dst` do not match the lengths implied by `cumsum`.
pub fn execute_naive(src: &[u8], elem_size: usize, cumsum: &CumulativeSums, dst: &mut [u8]) {
    assert!(elem_size > 0, "element size must be positive");
    assert_eq!(src.len(), cumsum.len() * elem_size);
    assert_eq!(dst.len(), cumsum.total() * elem_size);

    let mut out = dst;
    for (rec, count) in src.chunks_exact(elem_size).zip(cumsum.counts()) {
        let (head, tail) = std::mem::take(&mut out).split_at_mut(count * elem_size);
        fill_run(head, rec);
        out = tail;
    }
}
