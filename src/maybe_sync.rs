//! Feature-gated `Send` marker.
//!
//! With the `parallel` feature, [`MaybeSend`] is [`Send`]: results built on a
//! dedicated rayon pool must cross back to the calling thread. Without it the
//! trait is blanket-implemented for every type.

#[cfg(feature = "parallel")]
pub trait MaybeSend: Send {}
#[cfg(feature = "parallel")]
impl<T: Send> MaybeSend for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSend {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSend for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_records_satisfy_maybe_send() {
        fn _check_send<T: MaybeSend>() {}
        _check_send::<u8>();
        _check_send::<f64>();
        _check_send::<[u32; 3]>();
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn test_rc_satisfies_maybe_send_without_parallel() {
        use std::rc::Rc;
        fn _check_send<T: MaybeSend>() {}
        _check_send::<Rc<f64>>();
    }
}
