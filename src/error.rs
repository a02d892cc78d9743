//! Failures a [`Generator`][`crate::Generator`] can report.

use ::core::convert::Infallible;

/// What can go wrong when driving a generator, or inside its body.
///
/// `E` is the generator's [`Thrown`][`crate::Generator::Thrown`] type: the
/// user-level errors that the body may raise and that callers may inject
/// through [`.throw()`][`crate::Generator::throw`].
///
/// Generator bodies return [`GenResult`], so these same variants also
/// travel _inside_ the body: `yield_!` surfaces injected errors and the
/// close signal there, and `?` lets them unwind the body.
#[derive(Debug, ::thiserror::Error)]
pub
enum GenError<E = Infallible> {
    /// A user-level error: raised by the body itself, or injected at a
    /// suspension point through `.throw()` and left unhandled.
    #[error("{0}")]
    Raised(E),

    /// The termination signal delivered by `.close()`.
    ///
    /// Bodies are expected to let it propagate (possibly after some
    /// cleanup) rather than to yield again.
    #[error("generator exit")]
    GeneratorExit,

    /// The generator had already completed or errored: it produces no more
    /// values.
    #[error("generator already finished")]
    Exhausted,

    /// The body yielded after having been asked to close.
    #[error("generator ignored GeneratorExit")]
    IgnoredExit,

    /// The body `.await`ed a future which is not a yield point, something a
    /// synchronously driven generator cannot make progress on.
    #[error("generator body awaited something other than a yield point")]
    Stalled,
}

/// The return type of generator bodies.
pub
type GenResult<R, E = Infallible> = Result<R, GenError<E>>;

impl<E> GenError<E> {
    /// Whether this is the "no more values" signal, _i.e._, not a failure
    /// per se.
    #[inline]
    pub
    fn is_exhausted (self: &'_ Self)
      -> bool
    {
        matches!(self, Self::Exhausted)
    }

    /// Extracts the user-level error, if any.
    #[inline]
    pub
    fn into_raised (self: Self)
      -> Option<E>
    {
        match self {
            | Self::Raised(e) => Some(e),
            | _ => None,
        }
    }
}

impl<E> From<E> for GenError<E> {
    #[inline]
    fn from (e: E)
      -> Self
    {
        Self::Raised(e)
    }
}
