//! Byte sources.
//!
//! The Core only needs the three-way `read` contract described in
//! `SPEC_FULL.md` §6; this module supplies the concrete implementations a
//! complete crate needs to back its façade functions (`parse_string`,
//! `parse_file`, `parse_stream`).

use crate::error::SourceError;

/// Outcome of one [`ByteSource::read`] call.
#[derive(Debug)]
pub enum ReadOutcome {
    /// `n` bytes were written into the destination slice.
    Filled(usize),
    /// No bytes are available right now; try again later.
    WouldBlock,
    /// The source is exhausted; no further reads will produce data.
    EndOfStream,
}

/// A pull source of bytes that may be non-blocking.
///
/// Implementors need not be thread-safe; a `StreamReader` consumes one
/// exclusively for its lifetime.
pub trait ByteSource {
    /// Fill as much of `dst` as is currently available.
    ///
    /// # Errors
    /// Returns `Err` for any I/O failure other than "no data right now".
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, SourceError>;
}

/// Wraps an in-memory byte slice. Never reports [`ReadOutcome::WouldBlock`].
pub struct SliceSource<'a> {
    remaining: &'a [u8],
}

impl<'a> SliceSource<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { remaining: bytes }
    }
}

impl ByteSource for SliceSource<'_> {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, SourceError> {
        if self.remaining.is_empty() {
            return Ok(ReadOutcome::EndOfStream);
        }
        let n = dst.len().min(self.remaining.len());
        dst[..n].copy_from_slice(&self.remaining[..n]);
        self.remaining = &self.remaining[n..];
        Ok(ReadOutcome::Filled(n))
    }
}

#[cfg(feature = "std")]
mod std_sources {
    use super::{ByteSource, ReadOutcome};
    use crate::error::SourceError;
    use std::fs::File;
    use std::io::{self, Read};
    use std::path::Path;

    /// Wraps any [`std::io::Read`], translating `WouldBlock`/`Interrupted`
    /// into [`ReadOutcome::WouldBlock`] so genuinely non-blocking readers
    /// (a pipe or socket set to `O_NONBLOCK`) work without a dedicated
    /// adapter.
    pub struct ReaderSource<R: Read> {
        inner: R,
    }

    impl<R: Read> ReaderSource<R> {
        pub fn new(inner: R) -> Self {
            Self { inner }
        }
    }

    impl<R: Read> ByteSource for ReaderSource<R> {
        fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, SourceError> {
            loop {
                match self.inner.read(dst) {
                    Ok(0) => return Ok(ReadOutcome::EndOfStream),
                    Ok(n) => return Ok(ReadOutcome::Filled(n)),
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                        return Ok(ReadOutcome::WouldBlock);
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(SourceError(e.to_string())),
                }
            }
        }
    }

    /// Thin constructor sugar over `ReaderSource<File>`.
    pub struct FileSource {
        inner: ReaderSource<File>,
    }

    impl FileSource {
        /// # Errors
        /// Propagates the `std::fs::File::open` failure.
        pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
            let file = File::open(path).map_err(|e| SourceError(e.to_string()))?;
            Ok(Self {
                inner: ReaderSource::new(file),
            })
        }

        #[must_use]
        pub fn from_file(file: File) -> Self {
            Self {
                inner: ReaderSource::new(file),
            }
        }
    }

    impl ByteSource for FileSource {
        fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, SourceError> {
            self.inner.read(dst)
        }
    }
}

#[cfg(feature = "std")]
pub use std_sources::{FileSource, ReaderSource};
