//! The fixed-size pool of threads running blocking closures.

use ::std::{
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    thread,
};

use super::{blocking::panic_message, Result};

/// A unit of blocking work.
pub(in crate::runtime)
type Job = Box<dyn FnOnce() + Send + 'static>;

/// The worker threads, fed through a single unbounded queue.
///
/// Jobs are run in submission order, by whichever worker is idle; once every
/// worker is busy, later jobs wait in the queue.
pub(in crate::runtime)
struct WorkerPool {
    /// `None` once shut down.
    sender: Option<::flume::Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    pub(in crate::runtime)
    fn new (count: NonZeroUsize, thread_name: &'_ str)
      -> Result<Self>
    {
        let (sender, receiver) = ::flume::unbounded::<Job>();
        let mut pool = Self {
            sender: Some(sender),
            workers: Vec::with_capacity(count.get()),
        };
        for id in 0 .. count.get() {
            let receiver = receiver.clone();
            let worker =
                thread::Builder::new()
                    .name(format!("{}-{}", thread_name, id))
                    .spawn(move || main_loop(id, receiver))
            ;
            match worker {
                | Ok(worker) => pool.workers.push(worker),
                | Err(error) => {
                    ::tracing::error!(%error, "failed to spawn a worker thread");
                    // Joins the workers spawned so far.
                    pool.shutdown();
                    return Err(error.into());
                },
            }
        }
        ::tracing::debug!(workers = count.get(), "worker pool started");
        Ok(pool)
    }

    pub(in crate::runtime)
    fn worker_threads (self: &'_ Self)
      -> usize
    {
        self.workers.len()
    }

    pub(in crate::runtime)
    fn handle (self: &'_ Self)
      -> Handle
    {
        Handle {
            sender: self.sender.as_ref().map(::flume::Sender::downgrade),
        }
    }

    /// Lets the workers drain the queue, and joins them.
    pub(in crate::runtime)
    fn shutdown (self: &'_ mut Self)
    {
        if self.sender.take().is_none() {
            return;
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                ::tracing::warn!("a worker thread panicked");
            }
        }
        ::tracing::debug!("worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop (self: &'_ mut Self)
    {
        self.shutdown();
    }
}

fn main_loop (id: usize, receiver: ::flume::Receiver<Job>)
{
    let _span = ::tracing::trace_span!("worker", id).entered();
    // `recv` only fails once every sender is gone *and* the queue is empty.
    while let Ok(job) = receiver.recv() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            ::tracing::warn!(
                panic = %panic_message(&*payload),
                "detached job panicked",
            );
        }
    }
}

/// A non-owning handle to a [`WorkerPool`]: it does not keep the pool alive.
#[derive(Clone)]
pub(in crate::runtime)
struct Handle {
    sender: Option<::flume::WeakSender<Job>>,
}

impl Handle {
    /// Queues `job`, or hands it back if the pool is gone.
    pub(in crate::runtime)
    fn submit (self: &'_ Self, job: Job)
      -> ::core::result::Result<(), Job>
    {
        match self.sender.as_ref().and_then(::flume::WeakSender::upgrade) {
            | Some(sender) => sender.send(job).map_err(|::flume::SendError(job)| job),
            | None => Err(job),
        }
    }
}

/// Queues `job` onto the pool if there is one, else runs it right here.
pub(in crate::runtime)
fn submit_or_run (handle: Option<&'_ Handle>, job: Job)
{
    let job = match handle {
        | Some(handle) => match handle.submit(job) {
            | Ok(()) => return,
            | Err(job) => job,
        },
        | None => job,
    };
    ::tracing::debug!("no worker pool available, running job inline");
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
        ::tracing::warn!(
            panic = %panic_message(&*payload),
            "inline job panicked",
        );
    }
}
