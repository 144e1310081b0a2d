//! Owned, bounded-growth byte buffer used for decoded string scratch space.
//!
//! Mirrors the doubling-growth, reusable-allocation idiom the reader also
//! applies to its own sliding window (see `reader.rs`), but scoped to a
//! single small buffer rather than a whole stream.

use alloc::vec::Vec;

use crate::error::SyntaxError;

/// A growable byte buffer bounded by `max_size`. Used to materialize
/// decoded string content once an escape forces a copy off the fast path.
#[derive(Debug, Clone)]
pub(crate) struct GrowBuffer {
    data: Vec<u8>,
    initial_size: usize,
    max_size: usize,
}

impl GrowBuffer {
    pub(crate) fn new(initial_size: usize, max_size: usize) -> Self {
        Self {
            data: Vec::with_capacity(initial_size),
            initial_size,
            max_size,
        }
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Drop all content but keep the current allocation.
    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }

    /// Shrink the allocation back to `initial_size` if it has grown.
    pub(crate) fn reset(&mut self) {
        self.data.clear();
        if self.data.capacity() > self.initial_size {
            self.data.shrink_to(self.initial_size);
        }
    }

    pub(crate) fn write_byte(&mut self, byte: u8) -> Result<(), SyntaxError> {
        if self.data.len() >= self.max_size {
            return Err(SyntaxError::OutOfCapacity);
        }
        self.data.push(byte);
        Ok(())
    }

    pub(crate) fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SyntaxError> {
        if self.data.len() + bytes.len() > self.max_size {
            return Err(SyntaxError::OutOfCapacity);
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }
}
