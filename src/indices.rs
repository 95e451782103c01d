//! Expanded index generation and index-driven gather.
//!
//! `fill_indices` writes, for every output position, the source record that
//! owns it (`[0, 2, 3]` repeats give `[1, 1, 2, 2, 2]`). Those indices can be
//! broadcast by callers along other axes, or fed to [`execute_gather`].

use crate::cumsum::CumulativeSums;
use crate::kernel::{copy_record, record};
use crate::threading::{for_each_chunk_mut, for_each_index, SendPtr};

/// Write the owning source index of every output position into `dst`.
///
/// Parallel over source records.
///
/// # Panics
/// Panics if `dst.len() != cumsum.total()`.
pub fn fill_indices(cumsum: &CumulativeSums, dst: &mut [usize]) {
    assert_eq!(dst.len(), cumsum.total());

    let dst_ptr = SendPtr(dst.as_mut_ptr());
    for_each_index(cumsum.len(), |i| {
        let range = cumsum.range(i);
        // SAFETY: record ranges are disjoint and inside `dst`.
        let out = unsafe {
            std::slice::from_raw_parts_mut(dst_ptr.as_ptr().add(range.start), range.len())
        };
        out.fill(i);
    });
}

/// Copy `src[indices[p]]` into output slot `p` for every `p`.
///
/// # Panics
/// Panics if `dst` is not `indices.len() * elem_size` bytes or an index is
/// out of range for `src`.
pub fn execute_gather(src: &[u8], elem_size: usize, indices: &[usize], dst: &mut [u8]) {
    assert!(elem_size > 0, "element size must be positive");
    assert_eq!(dst.len(), indices.len() * elem_size);

    // Group slots so each task copies a contiguous block of records.
    const SLOTS_PER_TASK: usize = 1024;
    for_each_chunk_mut(dst, SLOTS_PER_TASK * elem_size, |k, block| {
        let first = k * SLOTS_PER_TASK;
        for (slot, &i) in block.chunks_exact_mut(elem_size).zip(&indices[first..]) {
            copy_record(slot, record(src, elem_size, i));
        }
    });
}
