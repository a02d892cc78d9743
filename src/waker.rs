//! The waker handed to generator bodies when they are polled.
//!
//! Generator bodies are driven synchronously, by `resume()` calls, so nobody
//! ever needs to be woken up: a body that gets `Pending` without having
//! filled its yield slot has [stalled][`crate::GenError::Stalled`].

use ::core::task::{RawWaker, RawWakerVTable, Waker};

const NOOP_VTABLE: RawWakerVTable = RawWakerVTable::new(
    |_| NOOP_RAW_WAKER,
    |_| {},
    |_| {},
    |_| {},
);

const NOOP_RAW_WAKER: RawWaker = RawWaker::new(::core::ptr::null(), &NOOP_VTABLE);

pub(in crate)
fn create ()
  -> Waker
{
    unsafe {
        // # Safety
        //
        //   - the data pointer is never dereferenced, and every vtable
        //     function is a no-op.
        Waker::from_raw(NOOP_RAW_WAKER)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn waking_is_a_no_op ()
    {
        let waker = super::create();
        waker.clone().wake();
        waker.wake_by_ref();
    }
}
