use ::std::{
    env::{self, VarError},
    num::NonZeroUsize,
    thread,
};

use super::{
    pool::WorkerPool,
    Error,
    EventLoop,
    Result,
};

/// Env variable that allows to override the default amount of worker threads.
pub
const WORKER_THREADS_ENV: &str = "COYIELD_WORKER_THREADS";

/// Upper bound on the amount of worker threads.
pub
const MAX_WORKER_THREADS: usize = 1024;

/// Upper bound on the _default_ amount of worker threads.
const DEFAULT_WORKER_THREADS_CAP: usize = 32;

const DEFAULT_THREAD_NAME: &str = "coyield-worker";

/// Configures and creates an [`EventLoop`].
///
/// ```rust
/// use ::coyield::runtime::EventLoop;
/// use ::std::num::NonZeroUsize;
///
/// # fn main () -> ::coyield::runtime::Result<()> {
/// let event_loop =
///     EventLoop::builder()
///         .worker_threads(NonZeroUsize::new(2).unwrap())
///         .thread_name("file-io")
///         .build()?
/// ;
/// assert_eq!(event_loop.worker_threads(), 2);
/// event_loop.close();
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub
struct Builder {
    worker_threads: Option<NonZeroUsize>,
    thread_name: String,
}

impl Default for Builder {
    fn default ()
      -> Self
    {
        Self::new()
    }
}

impl Builder {
    /// A builder with the defaults: `min(32, available_parallelism + 4)`
    /// workers (or whatever `COYIELD_WORKER_THREADS` says), named
    /// `coyield-worker-<n>`.
    pub
    fn new ()
      -> Self
    {
        Self {
            worker_threads: None,
            thread_name: DEFAULT_THREAD_NAME.into(),
        }
    }

    /// Sets the amount of worker threads, overriding the environment.
    pub
    fn worker_threads (mut self: Self, count: NonZeroUsize)
      -> Self
    {
        self.worker_threads = Some(count);
        self
    }

    /// Sets the prefix of the worker thread names.
    pub
    fn thread_name (mut self: Self, name: impl Into<String>)
      -> Self
    {
        self.thread_name = name.into();
        self
    }

    /// Spawns the worker pool.
    pub
    fn build (self: Self)
      -> Result<EventLoop>
    {
        let worker_threads = self.resolve_worker_threads(|key| env::var(key))?;
        let pool = WorkerPool::new(worker_threads, &self.thread_name)?;
        Ok(EventLoop::from_pool(pool))
    }

    fn resolve_worker_threads (
        self: &'_ Self,
        lookup_env: impl FnOnce(&str) -> ::core::result::Result<String, VarError>,
    ) -> Result<NonZeroUsize>
    {
        if let Some(count) = self.worker_threads {
            return check_bounds(count.get(), "worker_threads");
        }
        match lookup_env(WORKER_THREADS_ENV) {
            | Ok(raw) => parse_worker_threads(&raw),
            | Err(VarError::NotPresent) => Ok(default_worker_threads()),
            | Err(VarError::NotUnicode(_)) => Err(Error::InvalidConfig(format!(
                "`{}` is not valid unicode",
                WORKER_THREADS_ENV,
            ))),
        }
    }
}

fn parse_worker_threads (raw: &'_ str)
  -> Result<NonZeroUsize>
{
    let count: usize = raw.trim().parse().map_err(|_| {
        Error::InvalidConfig(format!(
            "`{}={}` is not a number",
            WORKER_THREADS_ENV, raw,
        ))
    })?;
    check_bounds(count, WORKER_THREADS_ENV)
}

fn check_bounds (count: usize, origin: &'_ str)
  -> Result<NonZeroUsize>
{
    NonZeroUsize::new(count)
        .filter(|count| count.get() <= MAX_WORKER_THREADS)
        .ok_or_else(|| Error::InvalidConfig(format!(
            "`{}` must be within 1..={}, got {}",
            origin, MAX_WORKER_THREADS, count,
        )))
}

fn default_worker_threads ()
  -> NonZeroUsize
{
    let cpus = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let count = DEFAULT_WORKER_THREADS_CAP.min(cpus + 4);
    NonZeroUsize::new(count).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with (value: &'static str)
      -> impl FnOnce(&str) -> ::core::result::Result<String, VarError>
    {
        move |key| {
            assert_eq!(key, WORKER_THREADS_ENV);
            Ok(value.into())
        }
    }

    fn no_env (_: &'_ str)
      -> ::core::result::Result<String, VarError>
    {
        Err(VarError::NotPresent)
    }

    #[test]
    fn defaults ()
    {
        let count = Builder::new().resolve_worker_threads(no_env).unwrap();
        assert!(count.get() >= 5);
        assert!(count.get() <= DEFAULT_WORKER_THREADS_CAP);
    }

    #[test]
    fn env_overrides_default ()
    {
        let count = Builder::new().resolve_worker_threads(env_with(" 3 ")).unwrap();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn explicit_setting_wins_over_env ()
    {
        let count =
            Builder::new()
                .worker_threads(NonZeroUsize::new(7).unwrap())
                .resolve_worker_threads(|_| panic!("env was looked up"))
                .unwrap()
        ;
        assert_eq!(count.get(), 7);
    }

    #[test]
    fn invalid_env_values_are_rejected ()
    {
        for value in ["0", "1025", "many", "-1", ""] {
            match Builder::new().resolve_worker_threads(env_with(value)) {
                | Err(Error::InvalidConfig(message)) => {
                    assert!(message.contains(WORKER_THREADS_ENV), "{}", message);
                },
                | other => panic!("{:?}: unexpected {:?}", value, other),
            }
        }
    }

    #[test]
    fn explicit_setting_is_bounded ()
    {
        let outcome =
            Builder::new()
                .worker_threads(NonZeroUsize::new(MAX_WORKER_THREADS + 1).unwrap())
                .build()
        ;
        assert!(matches!(outcome, Err(Error::InvalidConfig(_))));
    }
}
