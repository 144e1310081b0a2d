//! Error taxonomy.
//!
//! Three tiers, matching the parser's own grounding document: a closed
//! [`SyntaxError`] enum for malformed documents, a [`SourceError`] wrapper
//! for byte-source I/O failures, and the public [`ParseError`] that glues an
//! [`Origin`] onto either.

use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::origin::Origin;

/// Everything that can go wrong while lexing or structurally parsing a
/// document. `AGAIN` is deliberately absent: it is not an error, it is an
/// [`crate::event::EventKind`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("'\"' missing")]
    UnterminatedString,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid escape sequence \"\\u\"")]
    InvalidUnicodeEscape,
    #[error("not a legal unicode character")]
    InvalidCodePoint(u32),
    #[error("invalid number")]
    InvalidNumber,
    #[error("value expected")]
    ValueExpected,
    #[error("\",\" expected")]
    CommaExpected,
    #[error("\",\" missing")]
    CommaMissing,
    #[error("\":\" missing")]
    ColonMissing,
    #[error("field name not terminated")]
    FieldNameNotTerminated,
    #[error("nesting too deep")]
    NestingTooDeep,
    #[error("out of capacity")]
    OutOfCapacity,
    #[error("illegal parser state")]
    IllegalState,
}

/// Wraps a byte source's I/O failure so it can be distinguished from a
/// [`SyntaxError`] without losing the source's own `Display` text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SourceError(pub String);

/// Why `EventStream::next` (or a recognizer within it) failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A fatal parse failure, carrying the [`Origin`] of the byte at which it
/// was detected and an optional stream name.
///
/// `Display` renders in the form mandated for diagnostics: `Error on line
/// L, column C (offset O) of NAME: DETAIL`, with `of NAME` omitted when no
/// name was given to the parser façade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub origin: Origin,
    pub name: Option<String>,
    pub detail: ErrorDetail,
}

impl ParseError {
    pub(crate) fn new(origin: Origin, name: Option<String>, detail: impl Into<ErrorDetail>) -> Self {
        Self {
            origin,
            name,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error on {}", self.origin)?;
        if let Some(name) = &self.name {
            write!(f, " of {name}")?;
        }
        write!(f, ": {}", self.detail)
    }
}

impl core::error::Error for ParseError {}
