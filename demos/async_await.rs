//! Reads the first bytes of a file, from a coroutine, without ever blocking
//! the event loop thread.
//!
//! Usage: `cargo run --example async_await -- [path]` (default: `data.txt`).

use ::coyield::runtime::{self, fs, with_scoped, Scoped};

async fn read_prefix_utf8 (file: fs::File)
  -> runtime::Result<String>
{
    println!("reading (prefix of) file content");
    file.read_prefix_utf8(10).await
}

async fn open_and_read_prefix (path: String)
  -> runtime::Result<String>
{
    println!("opening file");
    let file = fs::open(&path).await?;
    let file = Scoped::new(file, |file: fs::File| {
        println!("closing file");
        file.close_blocking()
    });
    with_scoped(file, |file| async move {
        let prefix = read_prefix_utf8(file).await?;
        println!("file content: {}", prefix);
        Ok(prefix)
    }).await
}

fn init_logging ()
{
    use ::tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"))
    ;
    ::tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main ()
  -> runtime::Result<()>
{
    init_logging();
    let path = ::std::env::args().nth(1).unwrap_or_else(|| "data.txt".into());

    let mut event_loop = runtime::EventLoop::new()?;
    let outcome = event_loop.run_until_complete(open_and_read_prefix(path));
    event_loop.close();
    println!("done (including event loop)");
    outcome?.map(drop)
}
