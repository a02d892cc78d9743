//! `yield from`: running a sub-generator as if its body were inlined.

use super::*;

impl<'yield_slot, Item, Resume, Thrown> YieldSlot<'yield_slot, Item, Resume, Thrown> {
    #[doc(hidden)]
    /// Drives `inner` to completion from within the current body, and
    /// resolves to its return value.
    ///
    /// Every value `inner` yields is yielded out of the current generator,
    /// and whatever the consumer injects when resuming the current
    /// generator is forwarded to `inner`:
    ///
    ///   - sent values are forwarded to `inner.resume()`;
    ///
    ///   - thrown errors are forwarded to `inner.throw()`; if `inner` does not
    ///     handle them, they surface here;
    ///
    ///   - a close request closes `inner` first, and then unwinds the current
    ///     body with `GeneratorExit`.
    ///
    /// Errors raised by `inner` surface here too. Delegating to an already
    /// finished generator surfaces [`GenError::Exhausted`].
    pub
    async fn delegate<G> (self: &'_ Self, mut inner: G)
      -> GenResult<G::Return, Thrown>
    where
        G : Generator<Resume, Yield = Item, Thrown = Thrown> + Unpin,
    {
        let mut step = Pin::new(&mut inner).resume(None);
        loop {
            let yielded = match step {
                | Ok(GeneratorState::Yielded(yielded)) => yielded,
                | Ok(GeneratorState::Returned(returned)) => return Ok(returned),
                | Err(error) => return Err(error),
            };
            step = match self.suspend(yielded).await {
                | Ok(arg) => Pin::new(&mut inner).resume(arg),
                | Err(GenError::Raised(error)) => {
                    Pin::new(&mut inner).throw(error)
                },
                | Err(GenError::GeneratorExit) => {
                    Pin::new(&mut inner).close()?;
                    return Err(GenError::GeneratorExit);
                },
                | Err(other) => return Err(other),
            };
        }
    }
}
