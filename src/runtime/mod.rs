//! A minimal bridge between `async fn` coroutines and blocking calls.
//!
//! An [`EventLoop`] drives a single root coroutine on the thread that runs
//! it, and owns a fixed-size pool of worker threads. Inside that coroutine,
//! [`run_async`] offloads a blocking closure to the pool and returns an
//! awaitable for its result, so that the coroutine is suspended rather than
//! the whole thread being blocked. Coroutines compose with `.await`.
//!
//! ```rust,no_run
//! use ::coyield::runtime::{self, fs, with_scoped};
//!
//! async fn read_prefix (path: &str)
//!   -> runtime::Result<String>
//! {
//!     let file = fs::open_scoped(path).await?;
//!     // Whatever happens, the file gets closed.
//!     with_scoped(file, |file| async move {
//!         file.read_prefix_utf8(10).await
//!     }).await
//! }
//!
//! # fn main () -> runtime::Result<()> {
//! let prefix = runtime::run(read_prefix("data.txt"))??;
//! println!("file content: {}", prefix);
//! # Ok(()) }
//! ```
//!
//! The pool is a named limitation: once every worker is busy, later blocking
//! calls wait in its queue.

use ::core::future::Future;

pub use self::{
    blocking::{run_async, Blocking},
    config::{Builder, MAX_WORKER_THREADS, WORKER_THREADS_ENV},
    error::{Error, Result},
    event_loop::EventLoop,
    scoped::{with_scoped, Scoped},
};

mod blocking;
mod config;
mod error;
mod event_loop;
pub mod fs;
mod pool;
mod scoped;

/// Creates an [`EventLoop`] with the default configuration, runs `root` to
/// completion on it, and closes it.
pub
fn run<F : Future> (root: F)
  -> Result<F::Output>
{
    let mut event_loop = EventLoop::new()?;
    let output = event_loop.run_until_complete(root);
    event_loop.close();
    output
}
