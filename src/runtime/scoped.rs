//! Open resource / do work / always release.

use ::core::future::Future;

use super::{
    blocking,
    event_loop,
    pool::{self, Handle},
    Result,
};

type Release<R> = Box<dyn FnOnce(R) -> Result<()> + Send>;

struct Held<R> {
    resource: R,
    release: Release<R>,
}

/// A resource which must be released through a blocking call, exactly once.
///
///   - [`.release()`][`Scoped::release`] runs the release call on the worker
///     pool, and awaits it;
///
///   - otherwise, dropping the guard (_e.g._, because the coroutine owning
///     it was dropped while suspended) submits the release call to the pool
///     without waiting for it, or runs it right away if the pool is gone.
///
/// See [`with_scoped`] for the common pattern.
pub
struct Scoped<R : 'static + Send> {
    held: Option<Held<R>>,
    handle: Option<Handle>,
}

impl<R : 'static + Send> Scoped<R> {
    /// Guards `resource`, to be released with `release`.
    pub
    fn new (
        resource: R,
        release: impl 'static + Send + FnOnce(R) -> Result<()>,
    ) -> Self
    {
        Self {
            held: Some(Held { resource, release: Box::new(release) }),
            handle: event_loop::current_handle(),
        }
    }

    /// The guarded resource.
    pub
    fn get (self: &'_ Self)
      -> &'_ R
    {
        match &self.held {
            | Some(held) => &held.resource,
            | None => unreachable!("only `release` and `drop` give it up"),
        }
    }

    /// Releases the resource, through the worker pool.
    pub
    async fn release (mut self: Self)
      -> Result<()>
    {
        let Some(Held { resource, release }) = self.held.take() else {
            return Ok(());
        };
        blocking::spawn_or_inline(self.handle.as_ref(), move || release(resource)).await
    }
}

impl<R : 'static + Send> Drop for Scoped<R> {
    fn drop (self: &'_ mut Self)
    {
        let Some(Held { resource, release }) = self.held.take() else {
            return;
        };
        ::tracing::debug!("releasing a scoped resource from its guard's drop");
        pool::submit_or_run(self.handle.as_ref(), Box::new(move || {
            if let Err(error) = release(resource) {
                ::tracing::warn!(%error, "failed to release a scoped resource");
            }
        }));
    }
}

/// Runs `body` with (a clone of) the scoped resource, and then releases it,
/// whatever the outcome of `body`.
///
/// The release happens exactly once: after `body` succeeds, fails, or returns
/// early, and also when the coroutine awaiting this is dropped mid-way (see
/// [`Scoped`]). If both `body` and the release fail, the error of `body` is
/// returned and the release one is logged.
///
/// ```rust
/// use ::coyield::runtime::{self, with_scoped, Scoped};
/// use ::std::sync::{Arc, atomic::{AtomicBool, Ordering}};
///
/// # fn main () -> runtime::Result<()> {
/// let released = Arc::new(AtomicBool::new(false));
/// let outcome = runtime::run({
///     let released = Arc::clone(&released);
///     async move {
///         let guard = Scoped::new(21, move |_| {
///             released.store(true, Ordering::SeqCst);
///             Ok(())
///         });
///         with_scoped(guard, |x| async move { Ok(x * 2) }).await
///     }
/// })?;
/// assert_eq!(outcome?, 42);
/// assert!(released.load(Ordering::SeqCst));
/// # Ok(()) }
/// ```
pub
async fn with_scoped<R, T, Body, Fut> (scoped: Scoped<R>, body: Body)
  -> Result<T>
where
    R : 'static + Send + Clone,
    Body : FnOnce(R) -> Fut,
    Fut : Future<Output = Result<T>>,
{
    let outcome = body(scoped.get().clone()).await;
    let released = scoped.release().await;
    match (outcome, released) {
        | (Ok(value), Ok(())) => Ok(value),
        | (Ok(_), Err(release_error)) => Err(release_error),
        | (Err(error), Ok(())) => Err(error),
        | (Err(error), Err(release_error)) => {
            ::tracing::warn!(
                %release_error,
                "failed to release a scoped resource after a failure",
            );
            Err(error)
        },
    }
}
