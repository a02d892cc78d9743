//! Consuming generators as [`Iterator`]s.
//!
//! Iteration only ever [`advance`][`crate::GeneratorExt::advance`]s the
//! generator: no values are sent, no errors are thrown. Each item is a
//! `Result`, so that errors raised by the body reach the consumer; the
//! iteration ends on the "no more values" signal (return or exhaustion),
//! and right after an error, since errored generators are exhausted.
//!
//! ```rust
//! use ::coyield::prelude::*;
//!
//! #[generator(u32)]
//! fn countdown (start: u32)
//!   -> GenResult<()>
//! {
//!     for i in (0 ..= start).rev() {
//!         yield_!(i);
//!     }
//!     Ok(())
//! }
//!
//! mk_gen!(let generator = countdown(4));
//! let values: Result<Vec<_>, _> = generator.into_iter().collect();
//! assert_eq!(values.unwrap(), [4, 3, 2, 1, 0]);
//! ```

use_prelude!();
use ::core::ops::{Deref, DerefMut};

/// The item type of iterated generators.
pub
type Item<G> = Result<
    <G as Generator<()>>::Yield,
    GenError<<G as Generator<()>>::Thrown>,
>;

fn next_item<G : ?Sized + Generator<()>> (generator: Pin<&'_ mut G>)
  -> Option<Item<G>>
{
    match generator.resume(None) {
        | Ok(GeneratorState::Yielded(x)) => Some(Ok(x)),
        | Ok(GeneratorState::Returned(_)) => None,
        | Err(GenError::Exhausted) => None,
        | Err(error) => Some(Err(error)),
    }
}

/// An iterator over _any_ pinned generator (with `Resume = ()`).
///
/// See [`.gen_into_iter()`][`crate::GeneratorExt::gen_into_iter`] and
/// [`.boxed_gen_into_iter()`][`crate::GeneratorExt::boxed_gen_into_iter`].
pub
struct IterPin<P> (
    pub(in crate) Pin<P>,
);

impl<P> Iterator for IterPin<P>
where
    P : DerefMut,
    P::Target : Generator<()>,
{
    type Item = Item<<P as Deref>::Target>;

    fn next (self: &'_ mut Self)
      -> Option<Self::Item>
    {
        next_item(self.0.as_mut())
    }
}

impl<Item, R, Thrown, F>
    Iterator
for
    Pin<&'_ mut GeneratorFn<Item, F, (), Thrown>>
where
    F : Future<Output = GenResult<R, Thrown>>,
{
    type Item = Result<Item, GenError<Thrown>>;

    fn next (self: &'_ mut Self)
      -> Option<Self::Item>
    {
        next_item(self.as_mut())
    }
}

impl<Item, R, Thrown>
    Iterator
for
    Pin<&'_ mut (
        dyn '_ + Generator<(), Yield = Item, Return = R, Thrown = Thrown>
    )>
{
    type Item = Result<Item, GenError<Thrown>>;

    fn next (self: &'_ mut Self)
      -> Option<Self::Item>
    {
        next_item(self.as_mut())
    }
}

impl<Item, R, Thrown, F>
    Iterator
for
    Pin<::std::boxed::Box<GeneratorFn<Item, F, (), Thrown>>>
where
    F : Future<Output = GenResult<R, Thrown>>,
{
    type Item = Result<Item, GenError<Thrown>>;

    fn next (self: &'_ mut Self)
      -> Option<Self::Item>
    {
        next_item(self.as_mut())
    }
}

impl<Item, R, Thrown>
    Iterator
for
    Pin<::std::boxed::Box<
        dyn '_ + Generator<(), Yield = Item, Return = R, Thrown = Thrown>
    >>
{
    type Item = Result<Item, GenError<Thrown>>;

    #[inline]
    fn next (self: &'_ mut Self)
      -> Option<Self::Item>
    {
        next_item(self.as_mut())
    }
}
