//! Record-copy kernels shared by all executors.
//!
//! A run is `k` consecutive copies of one record. Common record widths get
//! a const-generic copy loop; anything else goes through `chunks_exact_mut`.

/// Byte slice of source record `i`.
#[inline]
pub(crate) fn record(src: &[u8], elem_size: usize, i: usize) -> &[u8] {
    &src[i * elem_size..(i + 1) * elem_size]
}

/// Fill `dst` with back-to-back copies of `rec`.
///
/// `dst.len()` must be a multiple of `rec.len()`.
#[inline]
pub(crate) fn fill_run(dst: &mut [u8], rec: &[u8]) {
    debug_assert_eq!(dst.len() % rec.len().max(1), 0);
    match rec.len() {
        1 => dst.fill(rec[0]),
        2 => fill_run_fixed::<2>(dst, rec),
        4 => fill_run_fixed::<4>(dst, rec),
        8 => fill_run_fixed::<8>(dst, rec),
        16 => fill_run_fixed::<16>(dst, rec),
        w => {
            for slot in dst.chunks_exact_mut(w) {
                slot.copy_from_slice(rec);
            }
        }
    }
}

#[inline(always)]
fn fill_run_fixed<const W: usize>(dst: &mut [u8], rec: &[u8]) {
    let mut buf = [0u8; W];
    buf.copy_from_slice(rec);
    for slot in dst.chunks_exact_mut(W) {
        slot.copy_from_slice(&buf);
    }
}

/// Copy one record into one slot.
#[inline]
pub(crate) fn copy_record(dst: &mut [u8], rec: &[u8]) {
    match rec.len() {
        1 => dst[0] = rec[0],
        w => dst[..w].copy_from_slice(rec),
    }
}
