/// Pins a local in place, shadowing it with a `Pin<&mut _>` to itself.
///
/// ```rust
/// use ::coyield::{prelude::*, GeneratorFn};
///
/// #[generator(char)]
/// fn letters ()
///   -> GenResult<()>
/// {
///     yield_!('a');
///     yield_!('b');
///     Ok(())
/// }
///
/// let generator = GeneratorFn::empty();
/// stack_pinned!(mut generator);
/// generator.as_mut().init(letters, ());
/// assert_eq!(generator.as_mut().advance().unwrap(), GeneratorState::Yielded('a'));
/// ```
#[macro_export]
macro_rules! stack_pinned {(
    mut $var:ident $(,)?
) => (
    let mut $var = $var;
    #[allow(unused_mut)]
    let mut $var = unsafe {
        // # Safety
        //
        //   - the original binding is shadowed, and can thus no longer be
        //     moved out of nor accessed in a non-pinned fashion.
        $crate::__::core::pin::Pin::new_unchecked(&mut $var)
    };
)}

/// Instantiates a `#[generator]` function, and pins the resulting
/// [`GeneratorFn`][`crate::GeneratorFn`]: the whole two-step
/// [`empty()`][`crate::GeneratorFn::empty`] +
/// [`init()`][`crate::GeneratorFn::init`] dance within a single statement.
///
/// None of the body runs: the generator starts off
/// [`Created`][`crate::Status::Created`].
///
///   - `mk_gen!(let gen = generator_fn(args, ...));` pins it in the _stack_
///     (`gen : Pin<&mut GeneratorFn<...>>`);
///
///   - `mk_gen!(let gen = box generator_fn(args, ...));` pins it in the
///     _heap_ (`gen : Pin<Box<GeneratorFn<...>>>`), so that it can be
///     returned, stored or yielded.
///
/// Prefix the binding with `mut` to be able to `.as_mut()` the generator.
///
/// ```rust
/// use ::coyield::prelude::*;
///
/// #[generator(yield(i64))]
/// fn countdown (start: i64)
///   -> GenResult<()>
/// {
///     let mut current = start;
///     while current >= 0 {
///         yield_!(current);
///         current -= 1;
///     }
///     Ok(())
/// }
///
/// mk_gen!(let mut on_stack = countdown(2));
/// assert_eq!(on_stack.as_mut().advance().unwrap(), GeneratorState::Yielded(2));
///
/// mk_gen!(let on_heap = box countdown(-1));
/// assert_eq!(on_heap.count(), 0);
/// ```
#[macro_export]
macro_rules! mk_gen {
    (
        let mut $var:ident = box $generator:tt ( $($args:expr),* $(,)? ) $(;)?
    ) => (
        let mut $var = $crate::CallBoxed::call_boxed($generator, ($($args, )*));
    );

    (
        let $var:ident = box $generator:tt ( $($args:expr),* $(,)? ) $(;)?
    ) => (
        let $var = $crate::CallBoxed::call_boxed($generator, ($($args, )*));
    );

    (
        let mut $var:ident = $generator:tt ( $($args:expr),* $(,)? ) $(;)?
    ) => (
        $crate::mk_gen!(@stack generator = $generator($($args),*));
        let mut $var = generator;
    );

    (
        let $var:ident = $generator:tt ( $($args:expr),* $(,)? ) $(;)?
    ) => (
        $crate::mk_gen!(@stack generator = $generator($($args),*));
        let $var = generator;
    );

    // The args are evaluated before `$var` is (re)bound, so that they may
    // refer to a previous binding of the same name.
    (
        @stack $pinned:ident = $generator:tt ( $($args:expr),* )
    ) => (
        let $pinned = $crate::GeneratorFn::empty();
        $crate::stack_pinned!(mut $pinned);
        $pinned.as_mut().init($generator, ($($args, )*));
    );
}
