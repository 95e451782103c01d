//! Rayon-backed parallel loops used by the executors.
//!
//! Every helper degrades to a plain sequential loop when the `parallel`
//! feature is disabled, so results never depend on the feature set.

use crate::Result;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A raw pointer wrapper that is `Send` + `Sync`.
///
/// # Safety
/// The caller must guarantee that the pointed-to data outlives the parallel
/// loop and that different tasks write to disjoint regions.
pub(crate) struct SendPtr<T>(pub(crate) *mut T);

impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SendPtr<T> {}

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    // Accessed through a method so closures capture the whole wrapper,
    // not the bare `*mut T` field.
    #[inline]
    pub(crate) fn as_ptr(self) -> *mut T {
        self.0
    }
}

/// Run `f` on a dedicated pool of `num_threads` workers, or on the current
/// pool when `num_threads` is `None`. Blocks until `f` returns.
#[cfg(feature = "parallel")]
pub(crate) fn install<R, F>(num_threads: Option<usize>, f: F) -> Result<R>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match num_threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            tracing::trace!(num_threads = n, "running on dedicated pool");
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn install<R, F>(_num_threads: Option<usize>, f: F) -> Result<R>
where
    F: FnOnce() -> R,
{
    Ok(f())
}

/// Call `f(k, chunk)` for every `chunk_len`-element chunk of `dst`.
///
/// Chunks are disjoint, so workers never share an output location.
pub(crate) fn for_each_chunk_mut<T, F>(dst: &mut [T], chunk_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(chunk_len)
        .enumerate()
        .for_each(|(k, chunk)| f(k, chunk));

    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(chunk_len)
        .enumerate()
        .for_each(|(k, chunk)| f(k, chunk));
}

/// Call `f(i)` for every `i` in `0..n`.
pub(crate) fn for_each_index<F>(n: usize, f: F)
where
    F: Fn(usize) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    (0..n).into_par_iter().for_each(f);

    #[cfg(not(feature = "parallel"))]
    (0..n).for_each(f);
}
