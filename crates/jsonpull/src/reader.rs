//! The sliding-window, resumable byte reader and its three token
//! recognizers (string, number, keyword literal).
//!
//! Every recognizer here can be interrupted by a `WouldBlock` read at any
//! byte boundary and resumed by calling the same method again: all
//! in-progress state (`number_state`, `string_state`, `literal_match`, the
//! `token_anchor`) lives on `StreamReader` itself rather than on a call
//! stack, so there is nothing to unwind.

use alloc::vec::Vec;

use crate::char_encoder::encode_utf8;
use crate::byte_slice::ByteSlice;
use crate::error::{ErrorDetail, SyntaxError};
use crate::event::EventKind;
use crate::grow_buffer::GrowBuffer;
use crate::origin::Origin;
use crate::source::{ByteSource, ReadOutcome};

/// Result of [`StreamReader::look_ahead`]: the next significant byte,
/// without consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookahead {
    Again,
    EndOfStream,
    Byte(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeekResult {
    Again,
    Eof,
    Byte(u8),
}

enum FillOutcome {
    Filled,
    Again,
    EndOfStream,
}

/// Whether a recognizer suspended (`Again`) or produced a payload
/// (`Done`); the payload itself is retrieved separately via
/// [`StreamReader::payload`] / [`StreamReader::pending_event_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecognizerStep {
    Again,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumState {
    IntDigits,
    AfterInt,
    AfterDot,
    FracDigits,
    ExpSign,
    ExpDigits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringState {
    Raw,
    Escape,
    Unicode { nibbles: u8, value: u32 },
}

/// Distinguishes a field name from a string value so an end-of-stream
/// while scanning can report which kind of token was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringContext {
    Value,
    FieldName,
}

pub(crate) struct StreamReader<S: ByteSource> {
    source: S,
    buffer: Vec<u8>,
    buffer_end: usize,
    cursor: usize,
    base_offset: u64,
    line: usize,
    line_start_offset: u64,
    chunk_size: usize,
    max_buffer_size: usize,

    token_anchor: usize,

    number_state: Option<NumState>,
    number_kind: EventKind,
    digit_run: u32,

    string_state: Option<StringState>,
    string_buf: GrowBuffer,
    escaped: bool,
    raw_copy_from: usize,

    literal_match: Option<(&'static [u8], usize, EventKind)>,

    payload_start: usize,
    payload_end: usize,
    payload_in_scratch: bool,
    pending_event_kind: Option<EventKind>,
}

impl<S: ByteSource> StreamReader<S> {
    pub(crate) fn new(source: S, chunk_size: usize, max_buffer_size: usize) -> Self {
        Self {
            source,
            buffer: alloc::vec![0u8; chunk_size],
            buffer_end: 0,
            cursor: 0,
            base_offset: 0,
            line: 1,
            line_start_offset: 0,
            chunk_size,
            max_buffer_size,
            token_anchor: 0,
            number_state: None,
            number_kind: EventKind::IntValue,
            digit_run: 0,
            string_state: None,
            string_buf: GrowBuffer::new(chunk_size.min(256), max_buffer_size),
            escaped: false,
            raw_copy_from: 0,
            literal_match: None,
            payload_start: 0,
            payload_end: 0,
            payload_in_scratch: false,
            pending_event_kind: None,
        }
    }

    /// Origin of the byte currently at `cursor`.
    pub(crate) fn position(&self) -> Origin {
        let offset = self.base_offset + self.cursor as u64;
        let column = (offset - self.line_start_offset) as usize + 1;
        Origin::new(self.line, column, offset)
    }

    /// Consume the byte most recently confirmed by `look_ahead`.
    pub(crate) fn advance(&mut self) {
        debug_assert!(self.cursor < self.buffer_end);
        self.cursor += 1;
    }

    pub(crate) fn pending_event_kind(&self) -> EventKind {
        self.pending_event_kind
            .expect("payload requested with no pending token")
    }

    pub(crate) fn payload(&self) -> ByteSlice<'_> {
        if self.payload_in_scratch {
            ByteSlice::new(self.string_buf.as_slice())
        } else {
            ByteSlice::new(&self.buffer[self.payload_start..self.payload_end])
        }
    }

    /// Skip ASCII whitespace and report the next significant byte without
    /// consuming it.
    pub(crate) fn look_ahead(&mut self) -> Result<Lookahead, ErrorDetail> {
        self.token_anchor = self.cursor;
        loop {
            if self.cursor < self.buffer_end {
                match self.buffer[self.cursor] {
                    b' ' | b'\t' | b'\r' => {
                        self.cursor += 1;
                        self.token_anchor = self.cursor;
                        continue;
                    }
                    b'\n' => {
                        self.cursor += 1;
                        self.line += 1;
                        self.line_start_offset = self.base_offset + self.cursor as u64;
                        self.token_anchor = self.cursor;
                        continue;
                    }
                    b => return Ok(Lookahead::Byte(b)),
                }
            }
            match self.fill_buffer()? {
                FillOutcome::Filled => continue,
                FillOutcome::Again => return Ok(Lookahead::Again),
                FillOutcome::EndOfStream => return Ok(Lookahead::EndOfStream),
            }
        }
    }

    fn peek_byte(&mut self) -> Result<PeekResult, ErrorDetail> {
        loop {
            if self.cursor < self.buffer_end {
                return Ok(PeekResult::Byte(self.buffer[self.cursor]));
            }
            match self.fill_buffer()? {
                FillOutcome::Filled => continue,
                FillOutcome::Again => return Ok(PeekResult::Again),
                FillOutcome::EndOfStream => return Ok(PeekResult::Eof),
            }
        }
    }

    /// Refill the window, preserving everything from `token_anchor`
    /// onward, growing the buffer if the preserved region leaves too
    /// little room for a full chunk.
    fn fill_buffer(&mut self) -> Result<FillOutcome, ErrorDetail> {
        let keep_from = self.token_anchor;
        if keep_from > 0 {
            self.buffer.copy_within(keep_from..self.buffer_end, 0);
            self.base_offset += keep_from as u64;
            self.cursor -= keep_from;
            self.token_anchor = 0;
            self.buffer_end -= keep_from;
        }
        if self.buffer.len() - self.buffer_end < self.chunk_size {
            let new_len = self
                .buffer
                .len()
                .saturating_add(self.chunk_size)
                .min(self.max_buffer_size);
            if new_len <= self.buffer.len() {
                return Err(SyntaxError::OutOfCapacity.into());
            }
            self.buffer.resize(new_len, 0);
        }
        let dst_end = (self.buffer_end + self.chunk_size).min(self.buffer.len());
        match self.source.read(&mut self.buffer[self.buffer_end..dst_end])? {
            ReadOutcome::Filled(n) => {
                self.buffer_end += n;
                Ok(FillOutcome::Filled)
            }
            ReadOutcome::WouldBlock => Ok(FillOutcome::Again),
            ReadOutcome::EndOfStream => Ok(FillOutcome::EndOfStream),
        }
    }

    fn scan_digits(&mut self) -> u32 {
        let start = self.cursor;
        while self.cursor < self.buffer_end && self.buffer[self.cursor].is_ascii_digit() {
            self.cursor += 1;
        }
        let n = (self.cursor - start) as u32;
        self.digit_run += n;
        n
    }

    fn finish_number(&mut self) -> Result<RecognizerStep, ErrorDetail> {
        self.payload_start = self.token_anchor;
        self.payload_end = self.cursor;
        self.payload_in_scratch = false;
        self.pending_event_kind = Some(self.number_kind);
        self.number_state = None;
        Ok(RecognizerStep::Done)
    }

    /// Number recognizer: the 6-state int/float sub-machine. Entry
    /// precondition: `cursor` is at a `-` or an ASCII digit.
    pub(crate) fn next_number(&mut self) -> Result<RecognizerStep, ErrorDetail> {
        if self.number_state.is_none() {
            self.token_anchor = self.cursor;
            if let PeekResult::Byte(b'-') = self.peek_byte()? {
                self.cursor += 1;
            }
            self.number_kind = EventKind::IntValue;
            self.digit_run = 0;
            self.number_state = Some(NumState::IntDigits);
        }
        loop {
            match self.number_state.expect("checked above") {
                NumState::IntDigits => {
                    self.scan_digits();
                    match self.peek_byte()? {
                        PeekResult::Again => return Ok(RecognizerStep::Again),
                        PeekResult::Eof => {
                            if self.digit_run == 0 {
                                return Err(SyntaxError::InvalidNumber.into());
                            }
                            return self.finish_number();
                        }
                        // A refill just landed more digits after `scan_digits`
                        // ran off the end of the buffer; loop and consume them
                        // rather than mistaking this for the terminator.
                        PeekResult::Byte(b) if b.is_ascii_digit() => {}
                        PeekResult::Byte(_) => {
                            if self.digit_run == 0 {
                                return Err(SyntaxError::InvalidNumber.into());
                            }
                            self.number_state = Some(NumState::AfterInt);
                        }
                    }
                }
                NumState::AfterInt => match self.peek_byte()? {
                    PeekResult::Again => return Ok(RecognizerStep::Again),
                    PeekResult::Eof => return self.finish_number(),
                    PeekResult::Byte(b'.') => {
                        self.cursor += 1;
                        self.number_kind = EventKind::FloatValue;
                        self.digit_run = 0;
                        self.number_state = Some(NumState::AfterDot);
                    }
                    PeekResult::Byte(b'e' | b'E') => {
                        self.cursor += 1;
                        self.number_kind = EventKind::FloatValue;
                        self.number_state = Some(NumState::ExpSign);
                    }
                    PeekResult::Byte(_) => return self.finish_number(),
                },
                NumState::AfterDot => {
                    self.scan_digits();
                    match self.peek_byte()? {
                        PeekResult::Again => return Ok(RecognizerStep::Again),
                        PeekResult::Eof => {
                            if self.digit_run == 0 {
                                return Err(SyntaxError::InvalidNumber.into());
                            }
                            return self.finish_number();
                        }
                        PeekResult::Byte(b) if b.is_ascii_digit() => {}
                        PeekResult::Byte(_) => {
                            if self.digit_run == 0 {
                                return Err(SyntaxError::InvalidNumber.into());
                            }
                            self.number_state = Some(NumState::FracDigits);
                        }
                    }
                }
                NumState::FracDigits => match self.peek_byte()? {
                    PeekResult::Again => return Ok(RecognizerStep::Again),
                    PeekResult::Eof => return self.finish_number(),
                    PeekResult::Byte(b'e' | b'E') => {
                        self.cursor += 1;
                        self.number_state = Some(NumState::ExpSign);
                    }
                    PeekResult::Byte(_) => return self.finish_number(),
                },
                NumState::ExpSign => {
                    match self.peek_byte()? {
                        PeekResult::Again => return Ok(RecognizerStep::Again),
                        PeekResult::Eof => return Err(SyntaxError::InvalidNumber.into()),
                        PeekResult::Byte(b'+' | b'-') => self.cursor += 1,
                        PeekResult::Byte(_) => {}
                    }
                    self.digit_run = 0;
                    self.number_state = Some(NumState::ExpDigits);
                }
                NumState::ExpDigits => {
                    self.scan_digits();
                    match self.peek_byte()? {
                        PeekResult::Again => return Ok(RecognizerStep::Again),
                        PeekResult::Eof => {
                            if self.digit_run == 0 {
                                return Err(SyntaxError::InvalidNumber.into());
                            }
                            return self.finish_number();
                        }
                        PeekResult::Byte(b) if b.is_ascii_digit() => {}
                        PeekResult::Byte(_) => {
                            if self.digit_run == 0 {
                                return Err(SyntaxError::InvalidNumber.into());
                            }
                            return self.finish_number();
                        }
                    }
                }
            }
        }
    }

    fn scan_string_raw(&mut self) {
        while self.cursor < self.buffer_end {
            match self.buffer[self.cursor] {
                b'"' | b'\\' => break,
                b'\n' => {
                    self.cursor += 1;
                    self.line += 1;
                    self.line_start_offset = self.base_offset + self.cursor as u64;
                }
                _ => self.cursor += 1,
            }
        }
    }

    /// String recognizer (field names and string values share it). Entry
    /// precondition: `cursor` is at the opening `"`. `context` only affects
    /// which error an end-of-stream reports.
    pub(crate) fn next_string(&mut self, context: StringContext) -> Result<RecognizerStep, ErrorDetail> {
        if self.string_state.is_none() {
            self.token_anchor = self.cursor;
            self.cursor += 1; // consume opening quote
            self.string_buf.clear();
            self.escaped = false;
            self.raw_copy_from = self.cursor;
            self.string_state = Some(StringState::Raw);
        }
        loop {
            match self.string_state.expect("checked above") {
                StringState::Raw => {
                    self.scan_string_raw();
                    match self.peek_byte()? {
                        PeekResult::Again => return Ok(RecognizerStep::Again),
                        PeekResult::Eof => {
                            return Err(match context {
                                StringContext::Value => SyntaxError::UnterminatedString,
                                StringContext::FieldName => SyntaxError::FieldNameNotTerminated,
                            }
                            .into());
                        }
                        PeekResult::Byte(b'"') => {
                            if self.escaped {
                                self.string_buf
                                    .write_slice(&self.buffer[self.raw_copy_from..self.cursor])?;
                                self.cursor += 1;
                                self.payload_in_scratch = true;
                            } else {
                                self.payload_start = self.token_anchor + 1;
                                self.payload_end = self.cursor;
                                self.payload_in_scratch = false;
                                self.cursor += 1;
                            }
                            self.string_state = None;
                            self.pending_event_kind = Some(EventKind::StringValue);
                            return Ok(RecognizerStep::Done);
                        }
                        PeekResult::Byte(b'\\') => {
                            self.string_buf
                                .write_slice(&self.buffer[self.raw_copy_from..self.cursor])?;
                            self.escaped = true;
                            self.cursor += 1;
                            self.string_state = Some(StringState::Escape);
                        }
                        // A refill landed more plain bytes after `scan_string_raw`
                        // ran off the end of the buffer; loop and keep scanning.
                        PeekResult::Byte(_) => {}
                    }
                }
                StringState::Escape => match self.peek_byte()? {
                    PeekResult::Again => return Ok(RecognizerStep::Again),
                    PeekResult::Eof => return Err(SyntaxError::InvalidEscape.into()),
                    PeekResult::Byte(b) => {
                        self.cursor += 1;
                        match b {
                            b'"' => self.string_buf.write_byte(b'"')?,
                            b'\\' => self.string_buf.write_byte(b'\\')?,
                            b'/' => self.string_buf.write_byte(b'/')?,
                            b'b' => self.string_buf.write_byte(0x08)?,
                            b'f' => self.string_buf.write_byte(0x0C)?,
                            b'n' => self.string_buf.write_byte(b'\n')?,
                            b'r' => self.string_buf.write_byte(b'\r')?,
                            b't' => self.string_buf.write_byte(b'\t')?,
                            b'u' => {
                                self.string_state = Some(StringState::Unicode { nibbles: 0, value: 0 });
                                continue;
                            }
                            _ => return Err(SyntaxError::InvalidEscape.into()),
                        }
                        self.raw_copy_from = self.cursor;
                        self.string_state = Some(StringState::Raw);
                    }
                },
                StringState::Unicode { nibbles, value } => {
                    if nibbles == 4 {
                        encode_utf8(&mut self.string_buf, value)?;
                        self.raw_copy_from = self.cursor;
                        self.string_state = Some(StringState::Raw);
                        continue;
                    }
                    match self.peek_byte()? {
                        PeekResult::Again => return Ok(RecognizerStep::Again),
                        PeekResult::Eof => return Err(SyntaxError::InvalidUnicodeEscape.into()),
                        PeekResult::Byte(b) => {
                            let digit = (b as char)
                                .to_digit(16)
                                .ok_or(SyntaxError::InvalidUnicodeEscape)?;
                            self.cursor += 1;
                            self.string_state = Some(StringState::Unicode {
                                nibbles: nibbles + 1,
                                value: (value << 4) | digit,
                            });
                        }
                    }
                }
            }
        }
    }

    fn is_ident_continue(b: u8) -> bool {
        b.is_ascii_alphanumeric()
    }

    /// Keyword recognizer for `true`/`false`/`null`. `lead` is the byte
    /// already confirmed (but not consumed) by `look_ahead`.
    pub(crate) fn next_keyword(&mut self, lead: u8) -> Result<RecognizerStep, ErrorDetail> {
        if self.literal_match.is_none() {
            self.token_anchor = self.cursor;
            let (word, kind): (&'static [u8], EventKind) = match lead {
                b't' => (b"true", EventKind::TrueValue),
                b'f' => (b"false", EventKind::FalseValue),
                b'n' => (b"null", EventKind::NullValue),
                _ => return Err(SyntaxError::ValueExpected.into()),
            };
            self.literal_match = Some((word, 0, kind));
        }
        loop {
            let (word, pos, kind) = self.literal_match.expect("checked above");
            if pos == word.len() {
                match self.peek_byte()? {
                    PeekResult::Again => return Ok(RecognizerStep::Again),
                    PeekResult::Byte(b) if Self::is_ident_continue(b) => {
                        self.literal_match = None;
                        return Err(SyntaxError::ValueExpected.into());
                    }
                    PeekResult::Eof | PeekResult::Byte(_) => {}
                }
                self.payload_start = self.token_anchor;
                self.payload_end = self.cursor;
                self.payload_in_scratch = false;
                self.pending_event_kind = Some(kind);
                self.literal_match = None;
                return Ok(RecognizerStep::Done);
            }
            match self.peek_byte()? {
                PeekResult::Again => return Ok(RecognizerStep::Again),
                PeekResult::Eof => {
                    self.literal_match = None;
                    return Err(SyntaxError::ValueExpected.into());
                }
                PeekResult::Byte(b) if b == word[pos] => {
                    self.cursor += 1;
                    self.literal_match = Some((word, pos + 1, kind));
                }
                PeekResult::Byte(_) => {
                    self.literal_match = None;
                    return Err(SyntaxError::ValueExpected.into());
                }
            }
        }
    }
}
