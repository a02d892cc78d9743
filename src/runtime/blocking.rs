use ::core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use ::std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};
use ::futures::channel::oneshot;

use super::{
    event_loop,
    pool::{self, Handle, Job},
    Error,
    Result,
};

/// Runs a blocking closure on the worker pool of the event loop running on
/// the current thread.
///
/// The returned [`Blocking`] resolves to whatever `f` returns: awaiting it
/// suspends the calling coroutine without blocking the event loop thread.
/// Errors are converted with [`Into`], so that, for instance, I/O errors keep
/// their kind and message.
///
/// The closure is submitted right away, whether the [`Blocking`] is awaited
/// or not.
///
/// ```rust
/// use ::coyield::runtime::{self, run_async};
///
/// # fn main () -> runtime::Result<()> {
/// let answer = runtime::run(async {
///     run_async(|| Ok::<_, ::std::io::Error>(21 * 2)).await
/// })??;
/// assert_eq!(answer, 42);
/// # Ok(()) }
/// ```
pub
fn run_async<F, T, E> (f: F)
  -> Blocking<T>
where
    F : 'static + Send + FnOnce() -> Result<T, E>,
    T : 'static + Send,
    E : Into<Error>,
{
    match event_loop::current_handle() {
        | Some(handle) => spawn_on(&handle, f),
        | None => Blocking::failed(Error::NoEventLoop),
    }
}

/// [`run_async`] onto a given pool.
pub(in crate::runtime)
fn spawn_on<F, T, E> (handle: &'_ Handle, f: F)
  -> Blocking<T>
where
    F : 'static + Send + FnOnce() -> Result<T, E>,
    T : 'static + Send,
    E : Into<Error>,
{
    let (job, receiver) = package(f);
    match handle.submit(job) {
        | Ok(()) => Blocking::pending(receiver),
        | Err(_) => Blocking::failed(Error::PoolShutdown),
    }
}

/// Like [`spawn_on`], but runs `f` on the current thread rather than not
/// running it at all when there is no pool to submit it to.
pub(in crate::runtime)
fn spawn_or_inline<F, T, E> (handle: Option<&'_ Handle>, f: F)
  -> Blocking<T>
where
    F : 'static + Send + FnOnce() -> Result<T, E>,
    T : 'static + Send,
    E : Into<Error>,
{
    let (job, receiver) = package(f);
    pool::submit_or_run(handle, job);
    Blocking::pending(receiver)
}

fn package<F, T, E> (f: F)
  -> (Job, oneshot::Receiver<Result<T>>)
where
    F : 'static + Send + FnOnce() -> Result<T, E>,
    T : 'static + Send,
    E : Into<Error>,
{
    let (sender, receiver) = oneshot::channel();
    let job: Job = Box::new(move || {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(f)) {
            | Ok(outcome) => outcome.map_err(Into::into),
            | Err(payload) => {
                let message = panic_message(&*payload);
                ::tracing::warn!(panic = %message, "blocking task panicked");
                Err(Error::Panicked(message))
            },
        };
        // The awaitable may have been dropped in the meantime.
        let _ = sender.send(outcome);
    });
    (job, receiver)
}

pub(in crate::runtime)
fn panic_message (payload: &'_ (dyn Any + Send))
  -> String
{
    if let Some(&message) = payload.downcast_ref::<&'static str>() {
        message.into()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".into()
    }
}

/// The awaitable result of a blocking closure: see [`run_async`].
///
/// Dropping it discards the result; the closure still runs.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub
struct Blocking<T> {
    state: State<T>,
}

enum State<T> {
    Pending(oneshot::Receiver<Result<T>>),
    Failed(Option<Error>),
}

impl<T> Blocking<T> {
    fn pending (receiver: oneshot::Receiver<Result<T>>)
      -> Self
    {
        Self { state: State::Pending(receiver) }
    }

    fn failed (error: Error)
      -> Self
    {
        Self { state: State::Failed(Some(error)) }
    }
}

impl<T> Future for Blocking<T> {
    type Output = Result<T>;

    fn poll (
        mut self: Pin<&'_ mut Self>,
        cx: &'_ mut Context<'_>,
    ) -> Poll<Result<T>>
    {
        match &mut self.state {
            | State::Pending(receiver) => match Pin::new(receiver).poll(cx) {
                | Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
                // The job was dropped without running.
                | Poll::Ready(Err(oneshot::Canceled)) => {
                    Poll::Ready(Err(Error::PoolShutdown))
                },
                | Poll::Pending => Poll::Pending,
            },
            | State::Failed(error) => match error.take() {
                | Some(error) => Poll::Ready(Err(error)),
                | None => panic!("`Blocking` polled after completion"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_messages ()
    {
        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(&*payload), "static");
        let payload = panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        assert_eq!(panic_message(&*payload), "formatted 42");
        let payload = panic::catch_unwind(|| panic::panic_any(0_u8)).unwrap_err();
        assert_eq!(panic_message(&*payload), "Box<dyn Any>");
    }

    #[test]
    fn outside_of_an_event_loop ()
    {
        let blocking = run_async(|| Ok::<_, Error>(()));
        match ::futures::executor::block_on(blocking) {
            | Err(Error::NoEventLoop) => {},
            | other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn inline_fallback_runs_the_closure ()
    {
        let blocking = spawn_or_inline(None, || Ok::<_, Error>(27));
        assert_eq!(::futures::executor::block_on(blocking).unwrap(), 27);
    }
}
