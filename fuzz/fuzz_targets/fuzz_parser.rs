#![no_main]

use jsonpull::{ByteSource, EventKind, EventStream, ParserConfig, ReadOutcome};
use libfuzzer_sys::fuzz_target;

/// Splits the fuzz input into arbitrary-width chunks and yields a
/// `WouldBlock` between every other chunk, so the recognizer's suspend and
/// resume paths see real input instead of always completing in one read.
struct Chunks<'a> {
    data: &'a [u8],
    pos: usize,
    width: usize,
    block_next: bool,
}

impl<'a> Chunks<'a> {
    fn new(data: &'a [u8], width: usize) -> Self {
        Self {
            data,
            pos: 0,
            width: width.max(1),
            block_next: true,
        }
    }
}

impl ByteSource for Chunks<'_> {
    fn read(&mut self, dst: &mut [u8]) -> Result<ReadOutcome, jsonpull::SourceError> {
        if self.block_next {
            self.block_next = false;
            return Ok(ReadOutcome::WouldBlock);
        }
        if self.pos >= self.data.len() {
            return Ok(ReadOutcome::EndOfStream);
        }
        let n = self.width.min(dst.len()).min(self.data.len() - self.pos);
        dst[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        self.block_next = true;
        Ok(ReadOutcome::Filled(n))
    }
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let width = usize::from(data[0]) + 1;
    let source = Chunks::new(&data[1..], width);
    let mut stream: EventStream<_> = jsonpull::parse_stream(None, source, ParserConfig::default());

    // Never panics: malformed or truncated input must surface as an `Err`,
    // never a Rust panic, and `Again` must always eventually resolve since
    // `Chunks` is a finite, non-blocking-forever source.
    loop {
        match stream.next() {
            Ok(ev) if ev.kind == EventKind::End => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }
});
