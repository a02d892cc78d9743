use ::std::{
    convert::Infallible,
    io,
    string::FromUtf8Error,
};

/// What can go wrong when bridging blocking calls into coroutines.
#[derive(Debug, ::thiserror::Error)]
pub
enum Error {
    /// A blocking I/O call failed. Kind and message are kept as is.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Bytes which were expected to be text were not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// A blocking closure panicked; this carries the panic message.
    #[error("blocking task panicked: {0}")]
    Panicked(String),

    /// A blocking call was submitted while no event loop was running on the
    /// current thread.
    #[error("no event loop is running on this thread")]
    NoEventLoop,

    /// An event loop was started on a thread already running one.
    #[error("an event loop is already running on this thread")]
    AlreadyRunning,

    /// The worker pool is gone: the event loop was closed.
    #[error("the worker pool has been shut down")]
    PoolShutdown,

    /// The event loop [`Builder`][`super::Builder`] was misconfigured.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any other failure of a blocking closure.
    #[error(transparent)]
    Other(#[from] Box<dyn ::std::error::Error + Send + Sync>),
}

impl From<Infallible> for Error {
    fn from (unreachable: Infallible)
      -> Self
    {
        match unreachable {}
    }
}

/// `Result` specialized to the runtime [`Error`].
pub
type Result<T, E = Error> = ::core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_transparent ()
    {
        let error = Error::from(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        assert_eq!(error.to_string(), "no such file");
        match error {
            | Error::Io(io_error) => assert_eq!(io_error.kind(), io::ErrorKind::NotFound),
            | other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn utf8_errors_convert ()
    {
        let error: Error = String::from_utf8(vec![0xff]).unwrap_err().into();
        assert!(matches!(error, Error::Utf8(_)));
        assert!(error.to_string().starts_with("invalid UTF-8"));
    }
}
