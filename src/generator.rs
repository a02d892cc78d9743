//! `stable` take on suspendable sequences, in the spirit of
//! <https://doc.rust-lang.org/1.57.0/core/ops/trait.Generator.html>, enhanced
//! with value injection (`send`), error injection (`throw`) and cooperative
//! cancellation (`close`).

use_prelude!();

/// The trait implemented by [`GeneratorFn`]s.
///
/// Generators, also commonly referred to as coroutines, provide an ergonomic
/// definition for iterators and other primitives, allowing to write iterators
/// and iterator adapters in a much more _imperative_ way, which may sometimes
/// improve the readability of such iterators / iterator adapters.
///
/// A generator is a paused computation: it is created without running any of
/// its body, and each call to [`.resume()`][`Generator::resume`] runs it up
/// to its next `yield_!` point (or to its end).
///
/// # Example
///
/// ```rust
/// use ::coyield::prelude::*;
///
/// #[generator(yield(i32))]
/// fn generator_fn ()
///   -> GenResult<&'static str>
/// {
///     yield_!(1);
///     Ok("foo")
/// }
///
/// mk_gen!(let mut generator = generator_fn());
///
/// assert_eq!(generator.status(), Status::Created);
/// match generator.as_mut().advance() {
///     | Ok(GeneratorState::Yielded(yielded)) => assert_eq!(yielded, 1),
///     | _ => panic!("expected a yield"),
/// }
/// match generator.as_mut().advance() {
///     | Ok(GeneratorState::Returned(returned)) => assert_eq!(returned, "foo"),
///     | _ => panic!("expected a return"),
/// }
/// assert!(generator.as_mut().advance().unwrap_err().is_exhausted());
/// ```
///
/// # `Generator` _vs._ `Iterator`
///
///   - a `Generator` can return a non-trivial value when exhausted,
///     contrary to an `Iterator`,
///
///   - it can be fed values and errors at each suspension point,
///
///   - but it requires to be `Pin`-ned in order to be
///     [`resume`][`Generator::resume`]d.
///
/// Pinned generators with `Resume = ()` are nevertheless iterable: they yield
/// `Result<Self::Yield, GenError<Self::Thrown>>` items, and end on the
/// "no more values" signal. See [`crate::iter`].
pub
trait Generator<Resume = ()> {
    /// The type of value this generator yields.
    ///
    /// This associated type corresponds to the `yield_!` expression and the
    /// values which are allowed to be returned each time a generator yields.
    type Yield;

    /// The type of value this generator returns.
    ///
    /// This corresponds to the `Ok` value the body completes with.
    type Return;

    /// The type of the user-level errors the body may raise, and which may
    /// be injected into it through [`.throw()`][`Generator::throw`].
    type Thrown;

    /// Resumes the execution of this generator.
    ///
    /// This function will resume execution of the generator or start execution
    /// if it hasn't already. This call will return back into the generator's
    /// last suspension point, resuming execution from the latest `yield_!`,
    /// which evaluates to `resume_arg`.
    ///
    /// When starting execution, `resume_arg` is ignored: there is no pending
    /// `yield_!` expression to receive it.
    ///
    /// # Return value
    ///
    ///   - `Ok(Yielded(_))`: the generator reached a suspension point
    ///     ([`Status::Suspended`]);
    ///
    ///   - `Ok(Returned(_))`: the body completed ([`Status::Completed`]);
    ///
    ///   - `Err(_)`: the body failed ([`Status::Errored`]), or the generator
    ///     was already finished ([`GenError::Exhausted`]), in which case
    ///     nothing runs.
    fn resume (
        self: Pin<&'_ mut Self>,
        resume_arg: Option<Resume>,
    ) -> Step<Self::Yield, Self::Return, Self::Thrown>
    ;

    /// Resumes the execution of this generator by making its pending
    /// `yield_!` expression fail with `error`.
    ///
    /// If the body does not handle it, the generator errors and `error` is
    /// propagated back. If the generator had not started, or is already
    /// finished, there is nothing that could catch `error`, so it is returned
    /// right away, and the generator is left (or becomes) terminal.
    fn throw (
        self: Pin<&'_ mut Self>,
        error: Self::Thrown,
    ) -> Step<Self::Yield, Self::Return, Self::Thrown>
    ;

    /// Cooperatively cancels this generator.
    ///
    /// If suspended, its pending `yield_!` expression fails with
    /// [`GenError::GeneratorExit`], letting the body run its cleanup. The
    /// body must not yield again ([`GenError::IgnoredExit`] otherwise).
    ///
    /// Closing a generator which never started does not run any of its body.
    /// Closing an already finished generator is a no-op.
    fn close (
        self: Pin<&'_ mut Self>,
    ) -> Result<(), GenError<Self::Thrown>>
    ;

    /// Where the generator currently stands in its lifecycle.
    fn status (self: &'_ Self)
      -> Status
    ;
}

/// Value obtained when [resuming][`Generator::resume`] a [`Generator`]
/// successfully.
///
/// This corresponds to:
///
///   - either a [suspension point][`GeneratorState::Yielded`],
///
///   - or a [termination point][`GeneratorState::Returned`]
#[derive(
    Debug,
    Clone, Copy,
    PartialOrd, Ord,
    PartialEq, Eq,
    Hash
)]
pub
enum GeneratorState<Yield, Return = ()> {
    /// The [`Generator`] suspended with a value.
    ///
    /// This state indicates that a [`Generator`] has been suspended, and
    /// corresponds to a `yield_!` statement. The value provided in this variant
    /// corresponds to the expression passed to `yield_!` and allows generators
    /// to provide a value each time they `yield_!`.
    Yielded(Yield),

    /// The [`Generator`] _completed_ with a [`Return`] value.
    ///
    /// Once a generator has returned, resuming it again yields
    /// [`GenError::Exhausted`].
    ///
    /// [`Return`]: Generator::Return
    Returned(Return),
}

impl<Yield> GeneratorState<Yield, ()> {
    /// Alias for `Returned(())`.
    #[allow(nonstandard_style)]
    pub
    const Complete: Self = Self::Returned(());
}

/// The outcome of a single [`resume`][`Generator::resume`] /
/// [`throw`][`Generator::throw`] call.
pub
type Step<Yield, Return, Thrown> = Result<
    GeneratorState<Yield, Return>,
    GenError<Thrown>,
>;

/// The lifecycle of a [`Generator`].
///
/// ```text
/// Created ──resume──▶ Suspended ◀──resume/send/throw──┐
///    │                   │  └─────────────────────────┘
///    │                   ├──body returns──▶ Completed
///    └──throw────────────┴──body raises───▶ Errored
/// ```
#[derive(
    Debug,
    Clone, Copy,
    PartialEq, Eq,
    Hash
)]
pub
enum Status {
    /// Not started yet: none of the body has run.
    Created,
    /// Paused at a `yield_!` point.
    Suspended,
    /// The body returned. Terminal.
    Completed,
    /// The body raised, panicked, or misbehaved. Terminal.
    Errored,
}

impl Status {
    /// Whether no more values can ever be produced.
    #[inline]
    pub
    fn is_terminal (self: Self)
      -> bool
    {
        matches!(self, Self::Completed | Self::Errored)
    }
}

// # TRANSITIVE IMPLS
// ## `?Unpin`
impl<Resume, G : ?Sized>
    Generator<Resume>
for
    Pin<&'_ mut G>
where
    G : Generator<Resume>,
{
    transitive_impl_deferring_to!(|self| (*self).as_mut());
}

impl<Resume, G : ?Sized>
    Generator<Resume>
for
    Pin<::std::boxed::Box<G>>
where
    G : Generator<Resume>,
{
    transitive_impl_deferring_to!(|self| (*self).as_mut());
}

// ## `Unpin`
impl<Resume, G : ?Sized>
    Generator<Resume>
for
    &'_ mut G
where
    G : Generator<Resume> + Unpin,
{
    transitive_impl_deferring_to!(|self| Pin::new(&mut **self));
}

impl<Resume, G : ?Sized>
    Generator<Resume>
for
    ::std::boxed::Box<G>
where
    G : Generator<Resume> + Unpin,
{
    transitive_impl_deferring_to!(|self| Pin::new(&mut **self));
}

// where:
macro_rules! transitive_impl_deferring_to {(
    |$self:tt| $expr:expr $(,)?
) => (
    type Yield = G::Yield;
    type Return = G::Return;
    type Thrown = G::Thrown;

    #[inline]
    fn resume (
        mut $self: Pin<&'_ mut Self>,
        arg: Option<Resume>,
    ) -> Step<Self::Yield, Self::Return, Self::Thrown>
    {
        <G as Generator<Resume>>::resume($expr, arg)
    }

    #[inline]
    fn throw (
        mut $self: Pin<&'_ mut Self>,
        error: Self::Thrown,
    ) -> Step<Self::Yield, Self::Return, Self::Thrown>
    {
        <G as Generator<Resume>>::throw($expr, error)
    }

    #[inline]
    fn close (
        mut $self: Pin<&'_ mut Self>,
    ) -> Result<(), GenError<Self::Thrown>>
    {
        <G as Generator<Resume>>::close($expr)
    }

    #[inline]
    fn status (self: &'_ Self)
      -> Status
    {
        <G as Generator<Resume>>::status(&**self)
    }
)} use transitive_impl_deferring_to;

/// Extension trait with some convenience methods for [`Generator`]s.
pub
trait GeneratorExt<Resume>
:
    Generator<Resume> +
{
    /// Runs the generator up to its next suspension point without injecting
    /// anything: `resume(None)`.
    #[inline]
    fn advance (
        self: Pin<&'_ mut Self>,
    ) -> Step<Self::Yield, Self::Return, Self::Thrown>
    {
        <Self as Generator<Resume>>::resume(self, None)
    }

    /// Resumes the generator, making its pending `yield_!` expression
    /// evaluate to `Some(value)`: `resume(Some(value))`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ::coyield::prelude::*;
    ///
    /// #[generator(yield(u32), resume(u32))]
    /// fn echo ()
    ///   -> GenResult<()>
    /// {
    ///     let mut last = 0;
    ///     loop {
    ///         last = yield_!(last).unwrap_or(last);
    ///     }
    /// }
    ///
    /// mk_gen!(let mut echo = echo());
    /// assert_eq!(echo.as_mut().advance().unwrap(), GeneratorState::Yielded(0));
    /// assert_eq!(echo.as_mut().send(7).unwrap(), GeneratorState::Yielded(7));
    /// assert_eq!(echo.as_mut().advance().unwrap(), GeneratorState::Yielded(7));
    /// ```
    #[inline]
    fn send (
        self: Pin<&'_ mut Self>,
        value: Resume,
    ) -> Step<Self::Yield, Self::Return, Self::Thrown>
    {
        <Self as Generator<Resume>>::resume(self, Some(value))
    }

    /// Same as [`.resume()`][`Generator::resume`], but with a `&mut Self`
    /// receiver rather than a `Pin<&mut Self>` one, for convenience, thanks to
    /// the `Unpin` bound.
    #[inline]
    fn resume_unpin (
        self: &'_ mut Self,
        resume_arg: Option<Resume>,
    ) -> Step<Self::Yield, Self::Return, Self::Thrown>
    where
        Self : Unpin,
    {
        <Self as Generator<Resume>>::resume(Pin::new(self), resume_arg)
    }

    /// Convenience method to convert _any_ (boxed) generator into an
    /// iterator.
    ///
    ///   - (provided `Resume = ()`).
    #[inline]
    fn boxed_gen_into_iter (
        self: Pin<::std::boxed::Box<Self>>,
    ) -> crate::iter::IterPin<
            ::std::boxed::Box<Self>,
        >
    where
        Self : Generator<()>,
    {
        crate::iter::IterPin(self)
    }

    /// Convenience method to convert _any_ borrowing pinned generator into an
    /// iterator.
    ///
    ///   - (provided `Resume = ()`).
    #[inline]
    fn gen_into_iter<'lt> (
        self: Pin<&'lt mut Self>,
    ) -> crate::iter::IterPin<
            &'lt mut Self,
        >
    where
        Self : Generator<()>,
    {
        crate::iter::IterPin(self)
    }
}

impl<Resume, G : ?Sized>
    GeneratorExt<Resume>
for
    G
where
    G : Generator<Resume>,
{}
