//! The top-level pull parser: event loop, structural stack, and the
//! builder-driven `read_value`/`read_array`/`read_object` convenience
//! methods.
//!
//! The structural state is an explicit tagged enum (`Cont`) rather than a
//! function-pointer table: there is exactly one outer state machine, whose
//! transitions are laid out in the big match in [`EventStream::next`].

use alloc::string::String;
use alloc::vec::Vec;

use crate::builder::{ArrayBuilder, ObjectBuilder, ValueArrayBuilder, ValueObjectBuilder};
use crate::byte_slice::ByteSlice;
use crate::config::ParserConfig;
use crate::error::{ErrorDetail, ParseError, SyntaxError};
use crate::event::EventKind;
use crate::factory::{DefaultFactory, PayloadFactory};
use crate::origin::Origin;
use crate::reader::{Lookahead, RecognizerStep, StreamReader, StringContext};
use crate::source::ByteSource;
use crate::value::{Array, Map, Value};

/// What to resume as once the collection currently being parsed (if any)
/// closes, or once the current value (if no collection is open) finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum After {
    Root,
    NextKey,
    NextArrayValue,
}

/// The parser's explicit program counter. One variant per named
/// continuation in `SPEC_FULL.md` §4.5; `Value(after)` subsumes both
/// `parse_initial_value` and every `restart_*_value` continuation, since
/// they differ only in what to resume as once the value completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cont {
    Value(After),
    FirstKey,
    NextKey,
    Key,
    ObjectValue,
    FirstArrayValue,
    NextArrayValue,
    Done,
}

/// A single parse event, borrowing its payload (if any) from the reader's
/// buffer. The borrow's lifetime is tied to the `&mut self` of the
/// `next()` call that produced it: the borrow checker forbids calling
/// `next()` again before the caller is done with the payload.
#[derive(Debug)]
pub struct Event<'a> {
    pub kind: EventKind,
    pub origin: Origin,
    pub payload: Option<ByteSlice<'a>>,
}

/// A streaming, resumable pull parser over a [`ByteSource`].
pub struct EventStream<S: ByteSource, F: PayloadFactory = DefaultFactory> {
    reader: StreamReader<S>,
    factory: F,
    name: Option<String>,
    current: Cont,
    stack: Vec<After>,
    max_depth: usize,
}

impl<S: ByteSource, F: PayloadFactory> EventStream<S, F> {
    pub fn new(source: S, name: Option<String>, factory: F, config: ParserConfig) -> Self {
        Self {
            reader: StreamReader::new(source, config.chunk_size, config.max_buffer_size),
            factory,
            name,
            current: Cont::Value(After::Root),
            stack: Vec::new(),
            max_depth: config.max_depth,
        }
    }

    fn wrap(&self, detail: ErrorDetail) -> ParseError {
        ParseError::new(self.reader.position(), self.name.clone(), detail)
    }

    fn wrap_syntax(&self, e: SyntaxError) -> ParseError {
        self.wrap(e.into())
    }

    fn after_to_cont(after: After) -> Cont {
        match after {
            After::Root => Cont::Done,
            After::NextKey => Cont::NextKey,
            After::NextArrayValue => Cont::NextArrayValue,
        }
    }

    fn pop_after(&mut self) -> After {
        self.stack
            .pop()
            .expect("structure stack depth tracks open containers")
    }

    /// Pull the next event. Returns `EventKind::Again` (not an error) when
    /// the byte source has no data right now; callers should retry later.
    /// Returns `EventKind::End` forever once the document is complete.
    ///
    /// # Errors
    /// Returns a fatal [`ParseError`] on malformed input or a source I/O
    /// failure. The stream is not resumable after an error.
    pub fn next(&mut self) -> Result<Event<'_>, ParseError> {
        loop {
            match self.current {
                Cont::Done => {
                    return Ok(Event {
                        kind: EventKind::End,
                        origin: self.reader.position(),
                        payload: None,
                    });
                }

                Cont::Value(after) => {
                    let lookahead = self.reader.look_ahead().map_err(|e| self.wrap(e))?;
                    match lookahead {
                        Lookahead::Again => {
                            return Ok(Event {
                                kind: EventKind::Again,
                                origin: self.reader.position(),
                                payload: None,
                            });
                        }
                        Lookahead::EndOfStream => {
                            return Err(self.wrap_syntax(SyntaxError::ValueExpected));
                        }
                        Lookahead::Byte(b'"') => match self
                            .reader
                            .next_string(StringContext::Value)
                            .map_err(|e| self.wrap(e))?
                        {
                            RecognizerStep::Again => {
                                return Ok(Event {
                                    kind: EventKind::Again,
                                    origin: self.reader.position(),
                                    payload: None,
                                });
                            }
                            RecognizerStep::Done => {
                                self.current = Self::after_to_cont(after);
                                return Ok(Event {
                                    kind: EventKind::StringValue,
                                    origin: self.reader.position(),
                                    payload: Some(self.reader.payload()),
                                });
                            }
                        },
                        Lookahead::Byte(b) if b == b'-' || b.is_ascii_digit() => {
                            match self.reader.next_number().map_err(|e| self.wrap(e))? {
                                RecognizerStep::Again => {
                                    return Ok(Event {
                                        kind: EventKind::Again,
                                        origin: self.reader.position(),
                                        payload: None,
                                    });
                                }
                                RecognizerStep::Done => {
                                    let kind = self.reader.pending_event_kind();
                                    self.current = Self::after_to_cont(after);
                                    return Ok(Event {
                                        kind,
                                        origin: self.reader.position(),
                                        payload: Some(self.reader.payload()),
                                    });
                                }
                            }
                        }
                        Lookahead::Byte(b'{') => {
                            if self.stack.len() >= self.max_depth {
                                return Err(self.wrap_syntax(SyntaxError::NestingTooDeep));
                            }
                            self.reader.advance();
                            self.stack.push(after);
                            self.current = Cont::FirstKey;
                            return Ok(Event {
                                kind: EventKind::BeginObject,
                                origin: self.reader.position(),
                                payload: None,
                            });
                        }
                        Lookahead::Byte(b'[') => {
                            if self.stack.len() >= self.max_depth {
                                return Err(self.wrap_syntax(SyntaxError::NestingTooDeep));
                            }
                            self.reader.advance();
                            self.stack.push(after);
                            self.current = Cont::FirstArrayValue;
                            return Ok(Event {
                                kind: EventKind::BeginArray,
                                origin: self.reader.position(),
                                payload: None,
                            });
                        }
                        Lookahead::Byte(b @ (b't' | b'f' | b'n')) => {
                            match self.reader.next_keyword(b).map_err(|e| self.wrap(e))? {
                                RecognizerStep::Again => {
                                    return Ok(Event {
                                        kind: EventKind::Again,
                                        origin: self.reader.position(),
                                        payload: None,
                                    });
                                }
                                RecognizerStep::Done => {
                                    let kind = self.reader.pending_event_kind();
                                    self.current = Self::after_to_cont(after);
                                    return Ok(Event {
                                        kind,
                                        origin: self.reader.position(),
                                        payload: None,
                                    });
                                }
                            }
                        }
                        Lookahead::Byte(_) => {
                            return Err(self.wrap_syntax(SyntaxError::ValueExpected));
                        }
                    }
                }

                Cont::FirstKey => match self.reader.look_ahead().map_err(|e| self.wrap(e))? {
                    Lookahead::Again => {
                        return Ok(Event {
                            kind: EventKind::Again,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::EndOfStream => return Err(self.wrap_syntax(SyntaxError::ValueExpected)),
                    Lookahead::Byte(b'}') => {
                        self.reader.advance();
                        let after = self.pop_after();
                        self.current = Self::after_to_cont(after);
                        return Ok(Event {
                            kind: EventKind::EndObject,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::Byte(b'"') => {
                        self.current = Cont::Key;
                    }
                    Lookahead::Byte(_) => return Err(self.wrap_syntax(SyntaxError::ValueExpected)),
                },

                Cont::NextKey => match self.reader.look_ahead().map_err(|e| self.wrap(e))? {
                    Lookahead::Again => {
                        return Ok(Event {
                            kind: EventKind::Again,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::EndOfStream => return Err(self.wrap_syntax(SyntaxError::CommaMissing)),
                    Lookahead::Byte(b'}') => {
                        self.reader.advance();
                        let after = self.pop_after();
                        self.current = Self::after_to_cont(after);
                        return Ok(Event {
                            kind: EventKind::EndObject,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::Byte(b',') => {
                        self.reader.advance();
                        self.current = Cont::Key;
                    }
                    Lookahead::Byte(_) => return Err(self.wrap_syntax(SyntaxError::CommaExpected)),
                },

                Cont::Key => match self.reader.look_ahead().map_err(|e| self.wrap(e))? {
                    Lookahead::Again => {
                        return Ok(Event {
                            kind: EventKind::Again,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::EndOfStream => return Err(self.wrap_syntax(SyntaxError::ValueExpected)),
                    Lookahead::Byte(b'"') => match self
                        .reader
                        .next_string(StringContext::FieldName)
                        .map_err(|e| self.wrap(e))?
                    {
                        RecognizerStep::Again => {
                            return Ok(Event {
                                kind: EventKind::Again,
                                origin: self.reader.position(),
                                payload: None,
                            });
                        }
                        RecognizerStep::Done => {
                            self.current = Cont::ObjectValue;
                            return Ok(Event {
                                kind: EventKind::FieldName,
                                origin: self.reader.position(),
                                payload: Some(self.reader.payload()),
                            });
                        }
                    },
                    Lookahead::Byte(_) => return Err(self.wrap_syntax(SyntaxError::ValueExpected)),
                },

                Cont::ObjectValue => match self.reader.look_ahead().map_err(|e| self.wrap(e))? {
                    Lookahead::Again => {
                        return Ok(Event {
                            kind: EventKind::Again,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::EndOfStream => return Err(self.wrap_syntax(SyntaxError::ColonMissing)),
                    Lookahead::Byte(b':') => {
                        self.reader.advance();
                        self.current = Cont::Value(After::NextKey);
                    }
                    Lookahead::Byte(_) => return Err(self.wrap_syntax(SyntaxError::ColonMissing)),
                },

                Cont::FirstArrayValue => match self.reader.look_ahead().map_err(|e| self.wrap(e))? {
                    Lookahead::Again => {
                        return Ok(Event {
                            kind: EventKind::Again,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::EndOfStream => return Err(self.wrap_syntax(SyntaxError::ValueExpected)),
                    Lookahead::Byte(b']') => {
                        self.reader.advance();
                        let after = self.pop_after();
                        self.current = Self::after_to_cont(after);
                        return Ok(Event {
                            kind: EventKind::EndArray,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::Byte(_) => {
                        self.current = Cont::Value(After::NextArrayValue);
                    }
                },

                Cont::NextArrayValue => match self.reader.look_ahead().map_err(|e| self.wrap(e))? {
                    Lookahead::Again => {
                        return Ok(Event {
                            kind: EventKind::Again,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::EndOfStream => return Err(self.wrap_syntax(SyntaxError::CommaMissing)),
                    Lookahead::Byte(b']') => {
                        self.reader.advance();
                        let after = self.pop_after();
                        self.current = Self::after_to_cont(after);
                        return Ok(Event {
                            kind: EventKind::EndArray,
                            origin: self.reader.position(),
                            payload: None,
                        });
                    }
                    Lookahead::Byte(b',') => {
                        self.reader.advance();
                        self.current = Cont::Value(After::NextArrayValue);
                    }
                    Lookahead::Byte(_) => return Err(self.wrap_syntax(SyntaxError::CommaExpected)),
                },
            }
        }
    }
}

impl<S: ByteSource> EventStream<S, DefaultFactory> {
    fn scalar_value(&self, kind: EventKind, payload: Option<ByteSlice<'_>>) -> Result<Value, ParseError> {
        match kind {
            EventKind::NullValue => Ok(Value::Null),
            EventKind::TrueValue => Ok(Value::Bool(true)),
            EventKind::FalseValue => Ok(Value::Bool(false)),
            EventKind::IntValue => self
                .factory
                .int_value(payload.expect("IntValue always carries a payload"))
                .map(Value::Int)
                .map_err(|e| self.wrap_syntax(e)),
            EventKind::FloatValue => self
                .factory
                .float_value(payload.expect("FloatValue always carries a payload"))
                .map(Value::Float)
                .map_err(|e| self.wrap_syntax(e)),
            EventKind::StringValue => self
                .factory
                .string_value(payload.expect("StringValue always carries a payload"))
                .map(Value::String)
                .map_err(|e| self.wrap_syntax(e)),
            _ => Err(self.wrap_syntax(SyntaxError::IllegalState)),
        }
    }

    /// Drive the event loop to materialize one complete JSON value
    /// (scalar, array, or object) using the default builders.
    ///
    /// # Errors
    /// As [`EventStream::next`].
    pub fn read_value(&mut self) -> Result<Value, ParseError> {
        let ev = self.next()?;
        match ev.kind {
            EventKind::BeginArray => Ok(Value::Array(self.read_array()?)),
            EventKind::BeginObject => Ok(Value::Object(self.read_object()?)),
            kind => self.scalar_value(kind, ev.payload),
        }
    }

    /// Drive the event loop until the matching `END_ARRAY`, building an
    /// [`Array`]. Call this immediately after receiving `BEGIN_ARRAY`.
    ///
    /// # Errors
    /// As [`EventStream::next`].
    pub fn read_array(&mut self) -> Result<Array, ParseError> {
        let mut builder = ValueArrayBuilder::start(self.reader.position());
        loop {
            let ev = self.next()?;
            match ev.kind {
                EventKind::EndArray => return Ok(builder.done()),
                EventKind::NullValue => builder.add_null_value().map_err(|e| self.wrap_syntax(e))?,
                EventKind::BeginArray => {
                    let value = Value::Array(self.read_array()?);
                    builder.add_value(value).map_err(|e| self.wrap_syntax(e))?;
                }
                EventKind::BeginObject => {
                    let value = Value::Object(self.read_object()?);
                    builder.add_value(value).map_err(|e| self.wrap_syntax(e))?;
                }
                kind => {
                    let value = self.scalar_value(kind, ev.payload)?;
                    builder.add_value(value).map_err(|e| self.wrap_syntax(e))?;
                }
            }
        }
    }

    /// Drive the event loop until the matching `END_OBJECT`, building a
    /// [`Map`]. Call this immediately after receiving `BEGIN_OBJECT`.
    ///
    /// # Errors
    /// As [`EventStream::next`].
    pub fn read_object(&mut self) -> Result<Map, ParseError> {
        let mut builder = ValueObjectBuilder::start(self.reader.position());
        loop {
            let ev = self.next()?;
            match ev.kind {
                EventKind::EndObject => return Ok(builder.done()),
                EventKind::FieldName => {
                    let name = self
                        .factory
                        .string_value(ev.payload.expect("FieldName always carries a payload"))
                        .map_err(|e| self.wrap_syntax(e))?;
                    let value_ev = self.next()?;
                    match value_ev.kind {
                        EventKind::NullValue => {
                            builder.set_field_to_null(name).map_err(|e| self.wrap_syntax(e))?;
                        }
                        EventKind::BeginArray => {
                            let value = Value::Array(self.read_array()?);
                            builder.set_field(name, value).map_err(|e| self.wrap_syntax(e))?;
                        }
                        EventKind::BeginObject => {
                            let value = Value::Object(self.read_object()?);
                            builder.set_field(name, value).map_err(|e| self.wrap_syntax(e))?;
                        }
                        kind => {
                            let value = self.scalar_value(kind, value_ev.payload)?;
                            builder.set_field(name, value).map_err(|e| self.wrap_syntax(e))?;
                        }
                    }
                }
                _ => return Err(self.wrap_syntax(SyntaxError::IllegalState)),
            }
        }
    }
}
