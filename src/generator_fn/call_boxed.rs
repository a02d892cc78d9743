use super::*;

/// Sugar for `Box::pin(GeneratorFn::empty()).tap_mut(|it| it.as_mut().init(…))`.
///
/// In other words,
///
/// ```rust
/// # #[cfg(any())] macro_rules! __ {
/// let gen = generator_fn.call_boxed((args, ...));
/// # }
/// ```
///
/// is the same as:
///
/// ```rust
/// # #[cfg(any())] macro_rules! __ {
/// mk_gen!(let gen = box generator_fn(args, ...));
/// # }
/// ```
///
/// Boxed generators can be moved around, returned, and stored in
/// collections, which makes them the natural choice for sub-generators
/// handed over to [`yield_from_!`][`crate::generator`] or yielded as
/// values of their own.
///
/// ## Examples
///
/// ```rust
/// use ::coyield::prelude::*;
///
/// #[generator(yield(u8), resume(u8))]
/// fn doubler ()
///   -> GenResult<()>
/// {
///     let mut x = 0;
///     loop {
///         x = yield_!(x * 2).unwrap_or(0);
///     }
/// }
///
/// let mut gen = doubler.call_boxed(());
/// assert_eq!(gen.as_mut().advance().unwrap(), GeneratorState::Yielded(0));
/// assert_eq!(gen.as_mut().send(21).unwrap(), GeneratorState::Yielded(42));
/// ```
pub trait CallBoxed<'yield_slot, Item, Resume, Thrown, Args> {
    /// The pinned, boxed generator.
    type CallBoxed;

    /// Instantiates the generator on the heap. None of its body runs.
    fn call_boxed (
        self: Self,
        args: Args,
    ) -> Self::CallBoxed;
}

impl<'yield_slot, Args, Factory, F, Item, Resume, Thrown>
    CallBoxed<'yield_slot, Item, Resume, Thrown, Args>
for
    Factory
where
    Item : 'yield_slot,
    Resume : 'yield_slot,
    Thrown : 'yield_slot,
    Factory : FnOnce(YieldSlot<'yield_slot, Item, Resume, Thrown>, Args) -> F,
    F : Future,
{
    type CallBoxed = Pin<::std::boxed::Box<
        GeneratorFn<Item, F, Resume, Thrown>
    >>;

    fn call_boxed (
        self: Factory,
        args: Args,
    ) -> Pin<::std::boxed::Box<
            GeneratorFn<Item, F, Resume, Thrown>
        >>
    {
        let mut gen = ::std::boxed::Box::pin(GeneratorFn::empty());
        gen.as_mut().init(self, args);
        gen
    }
}
