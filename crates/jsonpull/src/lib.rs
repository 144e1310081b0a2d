//! A streaming, resumable, pull-based JSON parser.
//!
//! The parser never blocks and never buffers a whole document: a caller
//! feeds it a [`source::ByteSource`] and pulls [`stream::Event`]s one at a
//! time, each valid only until the next pull. When the source has no data
//! right now, [`stream::EventStream::next`] returns
//! [`event::EventKind::Again`] instead of blocking, so the same parser can
//! sit behind a non-blocking socket, a chunked HTTP body, or a plain
//! in-memory slice without changing shape.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod byte_slice;
mod char_encoder;
mod config;
mod event;
mod grow_buffer;
mod origin;
mod reader;

mod builder;
mod error;
mod factory;
mod parser;
mod source;
mod stream;
mod value;

pub use builder::{ArrayBuilder, ObjectBuilder, ValueArrayBuilder, ValueObjectBuilder};
pub use byte_slice::ByteSlice;
pub use config::ParserConfig;
pub use error::{ErrorDetail, ParseError, SourceError, SyntaxError};
pub use event::EventKind;
pub use factory::{DefaultFactory, PayloadFactory};
pub use origin::Origin;
pub use parser::{parse_slice, parse_stream, parse_string};
#[cfg(feature = "std")]
pub use parser::{parse_file, parse_open_file};
pub use source::{ByteSource, ReadOutcome, SliceSource};
#[cfg(feature = "std")]
pub use source::{FileSource, ReaderSource};
pub use stream::{Event, EventStream};
pub use value::{Array, Map, Value};
