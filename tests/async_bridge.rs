#![cfg(feature = "runtime")]

use ::std::{
    io::{self, Write as _},
    num::NonZeroUsize,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use ::coyield::runtime::{self, fs, run_async, with_scoped, Error, EventLoop, Scoped};

fn data_file (contents: &'_ [u8])
  -> ::tempfile::NamedTempFile
{
    let mut file = ::tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file
}

async fn read_prefix (path: PathBuf, len: usize)
  -> runtime::Result<String>
{
    let file = fs::open_scoped(path).await?;
    with_scoped(file, |file| async move {
        file.read_prefix_utf8(len).await
    }).await
}

mod files {
    use super::*;

    #[test]
    fn reads_a_prefix ()
    {
        let data = data_file(b"hello, world! and then some");
        let prefix = runtime::run(read_prefix(data.path().to_owned(), 10)).unwrap();
        assert_eq!(prefix.unwrap(), "hello, wor");
    }

    #[test]
    fn short_files_are_read_whole ()
    {
        let data = data_file(b"hey");
        let prefix = runtime::run(read_prefix(data.path().to_owned(), 10)).unwrap();
        assert_eq!(prefix.unwrap(), "hey");
    }

    #[test]
    fn missing_files_keep_their_error_kind ()
    {
        let dir = ::tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        match runtime::run(read_prefix(missing, 10)).unwrap() {
            | Err(Error::Io(error)) => assert_eq!(error.kind(), io::ErrorKind::NotFound),
            | other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn invalid_utf8_is_reported ()
    {
        let data = data_file(&[b'o', b'k', 0xff, 0xfe]);
        match runtime::run(read_prefix(data.path().to_owned(), 10)).unwrap() {
            | Err(Error::Utf8(_)) => {},
            | other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn custom_release_closes_the_file_once ()
    {
        let data = data_file(b"hello, world!");
        let closes = Arc::new(AtomicUsize::new(0));
        let prefix = runtime::run({
            let closes = Arc::clone(&closes);
            async move {
                let file = fs::open(data.path()).await?;
                let file = Scoped::new(file, move |file: fs::File| {
                    closes.fetch_add(1, Ordering::SeqCst);
                    file.close_blocking()
                });
                with_scoped(file, |file| async move {
                    file.read_prefix_utf8(5).await
                }).await
            }
        }).unwrap();
        assert_eq!(prefix.unwrap(), "hello");
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cloned_handles_share_the_read_position ()
    {
        let data = data_file(b"0123456789");
        let (first, second) = runtime::run(async {
            let file = fs::open(data.path()).await?;
            let clone = file.clone();
            let first = file.read_prefix(4).await?;
            let second = clone.read_prefix(4).await?;
            clone.close().await?;
            file.close().await?;
            Ok::<_, Error>((first, second))
        }).unwrap().unwrap();
        assert_eq!(first, b"0123");
        assert_eq!(second, b"4567");
    }
}

mod blocking_calls {
    use super::*;

    #[test]
    fn results_come_back ()
    {
        let sum = runtime::run(async {
            let a = run_async(|| Ok::<_, io::Error>(40));
            let b = run_async(|| Ok::<_, io::Error>(2));
            Ok::<_, Error>(a.await? + b.await?)
        }).unwrap();
        assert_eq!(sum.unwrap(), 42);
    }

    #[test]
    fn errors_propagate_unchanged ()
    {
        let outcome = runtime::run(async {
            run_async(|| Err::<(), _>(io::Error::new(io::ErrorKind::Other, "nope"))).await
        }).unwrap();
        match outcome {
            | Err(Error::Io(error)) => {
                assert_eq!(error.kind(), io::ErrorKind::Other);
                assert_eq!(error.to_string(), "nope");
            },
            | other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn panics_are_reported_as_errors ()
    {
        let outcome = runtime::run(async {
            run_async(|| -> Result<(), io::Error> { panic!("boom") }).await
        }).unwrap();
        match outcome {
            | Err(Error::Panicked(message)) => assert_eq!(message, "boom"),
            | other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn the_pool_survives_panics ()
    {
        let mut event_loop = EventLoop::builder()
            .worker_threads(NonZeroUsize::MIN)
            .build()
            .unwrap()
        ;
        assert_eq!(event_loop.worker_threads(), 1);
        let outcome = event_loop.run_until_complete(async {
            let _ = run_async(|| -> Result<(), io::Error> { panic!("boom") }).await;
            run_async(|| Ok::<_, io::Error>("still there")).await
        }).unwrap();
        assert_eq!(outcome.unwrap(), "still there");
        event_loop.close();
    }

    #[test]
    fn outside_of_an_event_loop ()
    {
        match ::futures::executor::block_on(fs::open("data.txt")) {
            | Err(Error::NoEventLoop) => {},
            | other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn event_loops_do_not_nest ()
    {
        let outcome = runtime::run(async {
            runtime::run(async { 42 })
        }).unwrap();
        assert!(matches!(outcome, Err(Error::AlreadyRunning)));
        // The thread is free again afterwards.
        assert_eq!(runtime::run(async { 42 }).unwrap(), 42);
    }
}

mod scoped {
    use super::*;

    fn counted (releases: &'_ Arc<AtomicUsize>, fail: bool)
      -> Scoped<u32>
    {
        let releases = Arc::clone(releases);
        Scoped::new(21, move |_| {
            releases.fetch_add(1, Ordering::SeqCst);
            if fail {
                Err(Error::Other("release failed".into()))
            } else {
                Ok(())
            }
        })
    }

    fn run_with_releases<T> (
        root: impl FnOnce(Arc<AtomicUsize>) -> T,
    ) -> (T, usize)
    {
        let releases = Arc::new(AtomicUsize::new(0));
        let output = root(Arc::clone(&releases));
        (output, releases.load(Ordering::SeqCst))
    }

    #[test]
    fn released_after_success ()
    {
        let (outcome, releases) = run_with_releases(|releases| runtime::run(async move {
            with_scoped(counted(&releases, false), |x| async move { Ok(x * 2) }).await
        }));
        assert_eq!(outcome.unwrap().unwrap(), 42);
        assert_eq!(releases, 1);
    }

    #[test]
    fn released_after_failure ()
    {
        let (outcome, releases) = run_with_releases(|releases| runtime::run(async move {
            with_scoped(counted(&releases, false), |_| async move {
                Err::<(), _>(Error::Other("body failed".into()))
            }).await
        }));
        match outcome.unwrap() {
            | Err(error) => assert_eq!(error.to_string(), "body failed"),
            | Ok(()) => panic!("expected a failure"),
        }
        assert_eq!(releases, 1);
    }

    #[test]
    fn release_failures_are_reported ()
    {
        let (outcome, releases) = run_with_releases(|releases| runtime::run(async move {
            with_scoped(counted(&releases, true), |x| async move { Ok(x) }).await
        }));
        match outcome.unwrap() {
            | Err(error) => assert_eq!(error.to_string(), "release failed"),
            | Ok(_) => panic!("expected a failure"),
        }
        assert_eq!(releases, 1);
    }

    #[test]
    fn body_failures_win_over_release_failures ()
    {
        let (outcome, releases) = run_with_releases(|releases| runtime::run(async move {
            with_scoped(counted(&releases, true), |_| async move {
                Err::<(), _>(Error::Other("body failed".into()))
            }).await
        }));
        match outcome.unwrap() {
            | Err(error) => assert_eq!(error.to_string(), "body failed"),
            | Ok(()) => panic!("expected a failure"),
        }
        assert_eq!(releases, 1);
    }

    #[test]
    fn released_on_early_return ()
    {
        async fn bail (guard: Scoped<u32>, bail: bool)
          -> runtime::Result<u32>
        {
            if bail {
                return Ok(0);
            }
            let value = *guard.get();
            guard.release().await?;
            Ok(value)
        }

        let (outcome, releases) = run_with_releases(|releases| runtime::run(async move {
            bail(counted(&releases, false), true).await
        }));
        assert_eq!(outcome.unwrap().unwrap(), 0);
        assert_eq!(releases, 1);

        let (outcome, releases) = run_with_releases(|releases| runtime::run(async move {
            bail(counted(&releases, false), false).await
        }));
        assert_eq!(outcome.unwrap().unwrap(), 21);
        assert_eq!(releases, 1);
    }

    #[test]
    fn released_on_cancellation ()
    {
        let (outcome, releases) = run_with_releases(|releases| runtime::run(async move {
            let task = with_scoped(counted(&releases, false), |_| {
                ::futures::future::pending::<runtime::Result<()>>()
            });
            let mut task = ::std::pin::pin!(task);
            // Started, suspended, and then dropped mid-way.
            let pending = ::futures::poll!(task.as_mut()).is_pending();
            pending
        }));
        assert!(outcome.unwrap());
        assert_eq!(releases, 1);
    }

    #[test]
    fn released_even_without_an_event_loop ()
    {
        let (_, releases) = run_with_releases(|releases| {
            drop(counted(&releases, false));
        });
        assert_eq!(releases, 1);
    }
}
