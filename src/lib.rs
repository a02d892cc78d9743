//! Suspendable sequences on stable Rust: generators that can be advanced,
//! fed values (`send`), fed errors (`throw`), cooperatively cancelled
//! (`close`), and that can delegate to sub-generators (`yield_from_!`).
//!
//! ```rust
//! use ::coyield::prelude::*;
//!
//! #[generator(yield(i64), resume(i64))]
//! fn countdown (start: i64)
//!   -> GenResult<()>
//! {
//!     let mut current = start;
//!     while current >= 0 {
//!         // `send(delta)` makes `yield_!` evaluate to `Some(delta)`.
//!         let delta = yield_!(current).unwrap_or(1);
//!         current -= delta;
//!     }
//!     Ok(())
//! }
//!
//! mk_gen!(let mut generator = countdown(10));
//! let yielded = |step: Step<i64, (), _>| match step.unwrap() {
//!     | GeneratorState::Yielded(value) => value,
//!     | GeneratorState::Returned(()) => panic!("finished early"),
//! };
//! assert_eq!(yielded(generator.as_mut().advance()), 10);
//! assert_eq!(yielded(generator.as_mut().advance()), 9);
//! assert_eq!(yielded(generator.as_mut().send(5)), 4);
//! assert_eq!(yielded(generator.as_mut().advance()), 3);
//! # use ::coyield::Step;
//! ```
//!
//! With the `runtime` feature (enabled by default), the [`runtime`] module
//! bridges `async fn` coroutines with a pool of threads running blocking
//! calls.

#![warn(
    future_incompatible,
    rust_2018_compatibility,
    missing_docs,
    clippy::cargo,
    clippy::pedantic,
)]
#![deny(
    unused_must_use,
)]
#![doc(test(attr(deny(warnings))))]

extern crate self as coyield;

#[macro_use]
mod utils;

#[path = "public_prelude.rs"]
pub
mod prelude;

mod public_macros;

pub use self::error::*;
mod error;

pub use self::generator::*;
mod generator;

pub use self::generator_fn::{CallBoxed, GeneratorFn};
pub
mod generator_fn;

pub
mod iter;

mod waker;

#[doc(hidden)]
#[path = "macro_internals.rs"]
pub
mod __;

pub use ::coyield_proc_macros::generator;

#[cfg(feature = "runtime")]
pub
mod runtime;
