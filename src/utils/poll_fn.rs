use_prelude!();

/// Lifts a polling closure into an `.await`-able.
pub(in crate)
fn poll_fn<'f, F : 'f, T> (f: F)
  -> impl 'f + Unpin + Future<Output = T>
where
    F : FnMut(&mut Context<'_>) -> Poll<T>,
{
    struct PollFn<F> {
        f: F,
    }

    /// No pinning projection.
    impl<F> Unpin for PollFn<F> {}

    impl<T, F> Future for PollFn<F>
    where
        F : FnMut(&'_ mut Context<'_>) -> Poll<T>,
    {
        type Output = T;

        fn poll (
            mut self: Pin<&'_ mut PollFn<F>>,
            cx: &'_ mut Context<'_>,
        ) -> Poll<T>
        {
            (&mut self.f)(cx)
        }
    }

    PollFn { f }
}
