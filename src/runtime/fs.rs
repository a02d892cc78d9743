//! File helpers: every call is a blocking one, bridged through
//! [`run_async`].

use ::std::{
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use super::{run_async, Error, Result, Scoped};

/// An open, read-only, file.
///
/// Clones share the same OS handle (and thus the same read position), which
/// is closed once the last clone is closed or dropped.
#[derive(Debug, Clone)]
pub
struct File {
    inner: Arc<::std::fs::File>,
    path: PathBuf,
}

/// Opens `path` for reading.
pub
async fn open (path: impl AsRef<Path>)
  -> Result<File>
{
    let path = path.as_ref().to_owned();
    ::tracing::debug!(path = %path.display(), "opening file");
    run_async(move || {
        let inner = ::std::fs::File::open(&path)?;
        Ok::<_, Error>(File { inner: Arc::new(inner), path })
    }).await
}

/// Opens `path` for reading, guarded so that it gets closed no matter what:
/// see [`Scoped`].
pub
async fn open_scoped (path: impl AsRef<Path>)
  -> Result<Scoped<File>>
{
    let file = open(path).await?;
    Ok(Scoped::new(file, File::close_blocking))
}

impl File {
    /// The path this file was opened from.
    pub
    fn path (self: &'_ Self)
      -> &'_ Path
    {
        &self.path
    }

    /// Reads up to `len` bytes, from the current position. Fewer bytes are
    /// returned only when the end of the file is reached.
    pub
    async fn read_prefix (self: &'_ Self, len: usize)
      -> Result<Vec<u8>>
    {
        let inner = Arc::clone(&self.inner);
        run_async(move || {
            let mut bytes = Vec::with_capacity(len);
            (&*inner).take(len as u64).read_to_end(&mut bytes)?;
            Ok::<_, Error>(bytes)
        }).await
    }

    /// [`.read_prefix()`][`File::read_prefix`], decoded as UTF-8.
    ///
    /// A prefix which is not valid UTF-8 (including one ending in the middle
    /// of a multi-byte sequence) is reported as [`Error::Utf8`].
    pub
    async fn read_prefix_utf8 (self: &'_ Self, len: usize)
      -> Result<String>
    {
        let bytes = self.read_prefix(len).await?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Closes this handle to the file.
    pub
    async fn close (self: Self)
      -> Result<()>
    {
        run_async(move || self.close_blocking()).await
    }

    /// Closes this handle on the current thread, blocking it. Suited to
    /// [`Scoped`] release callbacks, which already run on a worker.
    pub
    fn close_blocking (self: Self)
      -> Result<()>
    {
        ::tracing::debug!(path = %self.path.display(), "closing file");
        match Arc::try_unwrap(self.inner) {
            | Ok(file) => drop(file),
            | Err(_) => ::tracing::debug!(
                path = %self.path.display(),
                "file handle still shared, closing it with its last clone",
            ),
        }
        Ok(())
    }
}
