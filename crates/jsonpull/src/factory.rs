//! Conversion of raw token text into caller-visible scalar values.
//!
//! The parser never retains its own notion of "the" integer or float type;
//! it hands the recognized [`ByteSlice`] to a [`PayloadFactory`] and moves
//! on. This mirrors the out-of-Core `PayloadFactory` collaborator.

use alloc::string::{String, ToString};

use crate::byte_slice::ByteSlice;
use crate::error::SyntaxError;

/// Converts recognized token text into the value types a caller wants.
pub trait PayloadFactory {
    /// The type produced for `INT_VALUE` tokens.
    type Int;
    /// The type produced for `FLOAT_VALUE` tokens.
    type Float;
    /// The type produced for `STRING_VALUE`/`FIELD_NAME` tokens.
    type Str;

    /// # Errors
    /// May reject text the recognizer accepted as number-shaped but the
    /// factory's own integer type cannot represent (e.g. overflow).
    fn int_value(&self, text: ByteSlice<'_>) -> Result<Self::Int, SyntaxError>;

    /// # Errors
    /// As [`PayloadFactory::int_value`], for floating point text.
    fn float_value(&self, text: ByteSlice<'_>) -> Result<Self::Float, SyntaxError>;

    /// # Errors
    /// Only fails if `text` is not valid UTF-8 once escapes are decoded,
    /// which the recognizer already guarantees cannot happen for the
    /// default encoder.
    fn string_value(&self, text: ByteSlice<'_>) -> Result<Self::Str, SyntaxError>;
}

/// The factory used when a caller has no reason to supply their own:
/// `i64`, `f64`, owned [`String`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl PayloadFactory for DefaultFactory {
    type Int = i64;
    type Float = f64;
    type Str = String;

    fn int_value(&self, text: ByteSlice<'_>) -> Result<i64, SyntaxError> {
        let s = text.to_string_lossy();
        s.parse::<i64>().map_err(|_| SyntaxError::InvalidNumber)
    }

    fn float_value(&self, text: ByteSlice<'_>) -> Result<f64, SyntaxError> {
        let s = text.to_string_lossy();
        s.parse::<f64>().map_err(|_| SyntaxError::InvalidNumber)
    }

    fn string_value(&self, text: ByteSlice<'_>) -> Result<String, SyntaxError> {
        Ok(text.to_string_lossy().to_string())
    }
}
