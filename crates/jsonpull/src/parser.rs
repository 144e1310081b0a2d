//! Parser façade: convenience constructors that pick a [`ByteSource`] and
//! hand back an [`EventStream`] with the default payload factory.

use alloc::string::{String, ToString};

use crate::config::ParserConfig;
use crate::factory::DefaultFactory;
use crate::source::{ByteSource, SliceSource};
use crate::stream::EventStream;

/// Parse from an arbitrary [`ByteSource`], tagging diagnostics with `name`.
pub fn parse_stream<S: ByteSource>(
    name: Option<String>,
    source: S,
    config: ParserConfig,
) -> EventStream<S, DefaultFactory> {
    EventStream::new(source, name, DefaultFactory, config)
}

/// Parse a complete in-memory document. `name` tags diagnostics; pass
/// `None` for anonymous input.
pub fn parse_string(
    name: Option<String>,
    text: &str,
    config: ParserConfig,
) -> EventStream<SliceSource<'_>, DefaultFactory> {
    EventStream::new(SliceSource::new(text.as_bytes()), name, DefaultFactory, config)
}

/// Parse an in-memory byte slice that need not be valid UTF-8 up front
/// (the recognizers validate string content as they decode escapes).
pub fn parse_slice(
    name: Option<String>,
    bytes: &[u8],
    config: ParserConfig,
) -> EventStream<SliceSource<'_>, DefaultFactory> {
    EventStream::new(SliceSource::new(bytes), name, DefaultFactory, config)
}

#[cfg(feature = "std")]
mod std_facade {
    use std::path::Path;

    use super::{DefaultFactory, EventStream, ParserConfig, String, ToString};
    use crate::error::SourceError;
    use crate::source::FileSource;

    /// Open `path` and parse it, using the path's display form as the
    /// diagnostic name.
    ///
    /// # Errors
    /// Propagates a failure to open the file.
    pub fn parse_file(
        path: impl AsRef<Path>,
        config: ParserConfig,
    ) -> Result<EventStream<FileSource, DefaultFactory>, SourceError> {
        let name = path.as_ref().display().to_string();
        let source = FileSource::open(path)?;
        Ok(EventStream::new(source, Some(name), DefaultFactory, config))
    }

    /// Parse an already-open file, tagging diagnostics with `name`.
    pub fn parse_open_file(
        name: Option<String>,
        file: std::fs::File,
        config: ParserConfig,
    ) -> EventStream<FileSource, DefaultFactory> {
        EventStream::new(FileSource::from_file(file), name, DefaultFactory, config)
    }
}

#[cfg(feature = "std")]
pub use std_facade::{parse_file, parse_open_file};
