use ::core::{
    cell::RefCell,
    future::Future,
    marker::PhantomData,
    task::{Context, Poll},
};
use ::std::{
    sync::Arc,
    task::{Wake, Waker},
    thread::{self, Thread},
};

use super::{
    pool::{Handle, WorkerPool},
    Builder,
    Error,
    Result,
};

thread_local! {
    /// The pool of the event loop running on this thread, if any.
    static CURRENT: RefCell<Option<Handle>> = RefCell::new(None);
}

pub(in crate::runtime)
fn current_handle ()
  -> Option<Handle>
{
    CURRENT.with(|current| current.borrow().clone())
}

/// Marks the current thread as running an event loop, for as long as it
/// lives.
struct Enter {
    _not_send: PhantomData<*const ()>,
}

impl Enter {
    fn new (handle: Handle)
      -> Result<Self>
    {
        CURRENT.with(|current| {
            let mut current = current.borrow_mut();
            if current.is_some() {
                return Err(Error::AlreadyRunning);
            }
            *current = Some(handle);
            Ok(Self { _not_send: PhantomData })
        })
    }
}

impl Drop for Enter {
    fn drop (self: &'_ mut Self)
    {
        let _ = CURRENT.try_with(|current| current.borrow_mut().take());
    }
}

/// A single-threaded scheduler for one root coroutine, plus the fixed pool
/// of worker threads its blocking calls are offloaded to.
///
/// ```rust
/// use ::coyield::runtime::{run_async, EventLoop};
///
/// # fn main () -> ::coyield::runtime::Result<()> {
/// let mut event_loop = EventLoop::new()?;
/// let sum = event_loop.run_until_complete(async {
///     let a = run_async(|| Ok::<_, ::std::io::Error>(1));
///     let b = run_async(|| Ok::<_, ::std::io::Error>(2));
///     Ok::<_, ::coyield::runtime::Error>(a.await? + b.await?)
/// })??;
/// assert_eq!(sum, 3);
/// event_loop.close();
/// # Ok(()) }
/// ```
pub
struct EventLoop {
    pool: WorkerPool,
}

impl EventLoop {
    /// An event loop with the default configuration.
    ///
    /// See [`Builder`].
    pub
    fn new ()
      -> Result<Self>
    {
        Builder::new().build()
    }

    /// Configure the event loop before creating it.
    pub
    fn builder ()
      -> Builder
    {
        Builder::new()
    }

    pub(in crate::runtime)
    fn from_pool (pool: WorkerPool)
      -> Self
    {
        Self { pool }
    }

    /// The size of the worker pool.
    pub
    fn worker_threads (self: &'_ Self)
      -> usize
    {
        self.pool.worker_threads()
    }

    /// Drives `root` to completion on the current thread, which sleeps
    /// whenever `root` is waiting on blocking calls.
    ///
    /// Fails with [`Error::AlreadyRunning`] when called from within a
    /// coroutine already driven by an event loop.
    pub
    fn run_until_complete<F : Future> (self: &'_ mut Self, root: F)
      -> Result<F::Output>
    {
        let _enter = Enter::new(self.pool.handle())?;
        ::tracing::debug!("event loop running");
        let output = block_on(root);
        ::tracing::debug!("event loop idle");
        Ok(output)
    }

    /// Shuts the worker pool down, after letting it run whatever was
    /// submitted to it.
    pub
    fn close (mut self: Self)
    {
        self.pool.shutdown();
        ::tracing::debug!("event loop closed");
    }
}

struct Unparker(Thread);

impl Wake for Unparker {
    fn wake (self: Arc<Self>)
    {
        self.0.unpark();
    }

    fn wake_by_ref (self: &'_ Arc<Self>)
    {
        self.0.unpark();
    }
}

fn block_on<F : Future> (future: F)
  -> F::Output
{
    let mut future = ::std::pin::pin!(future);
    let waker = Waker::from(Arc::new(Unparker(thread::current())));
    let mut cx = Context::from_waker(&waker);
    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
        // Spurious wake-ups merely lead to an extra poll.
        thread::park();
    }
}
