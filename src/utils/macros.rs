macro_rules! use_prelude {() => (
    #[allow(unused_imports)]
    use crate::utils::prelude::*;
)}

macro_rules! create_context {(
    $cx:ident
) => (
    let waker: ::core::task::Waker = $crate::waker::create();
    let mut $cx = ::core::task::Context::from_waker(&waker);
)}

macro_rules! abort_with_msg {(
    $($msg:tt)*
) => ({
    ::std::eprintln!($($msg)*);
    ::std::process::abort();
})}
pub(in crate) use abort_with_msg;
