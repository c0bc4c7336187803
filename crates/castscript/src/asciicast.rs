//! Asciinema asciicast v2 and v3 format support.
//!
//! An asciicast is newline-delimited JSON: one header object followed by
//! one event array per line. Lines starting with `#` are comments.
//!
//! [`AsciicastReader`] and [`AsciicastWriter`] stream a recording one line
//! at a time; nothing is buffered beyond the current line.

pub mod event;
pub mod header;

use std::io::{BufRead, Write};

pub use event::{Event, decode_event, encode_event, is_comment};
pub use header::{
    CastVersion, Env, Header, HeaderV2, HeaderV3, TermInfo, Theme, decode_header, encode_header,
};

use crate::error::{CastError, Result};

/// Streaming asciicast reader.
#[derive(Debug)]
pub struct AsciicastReader<R> {
    inner: R,
    line: Vec<u8>,
}

impl<R: BufRead> AsciicastReader<R> {
    /// Wrap a buffered source.
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
        }
    }

    /// Read the next raw line into the internal buffer.
    ///
    /// Returns `false` at a clean end of stream.
    fn fill_line(&mut self, context: &str) -> Result<bool> {
        self.line.clear();
        let n = CastError::with_io_context(self.inner.read_until(b'\n', &mut self.line), context)?;
        Ok(n > 0)
    }

    /// Read the header line.
    ///
    /// Returns `Ok(None)` if the stream is empty.
    pub fn read_header(&mut self) -> Result<Option<Header>> {
        if !self.fill_line("reading asciicast header line")? {
            return Ok(None);
        }
        decode_header(&self.line).map(Some)
    }

    /// Read the next event, skipping comment and blank lines.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub fn read_event(&mut self) -> Result<Option<Event>> {
        loop {
            if !self.fill_line("reading asciicast event line")? {
                return Ok(None);
            }
            if is_comment(&self.line) || self.line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return decode_event(&self.line).map(Some);
        }
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> Iterator for AsciicastReader<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_event().transpose()
    }
}

/// Streaming asciicast writer.
#[derive(Debug)]
pub struct AsciicastWriter<W> {
    inner: W,
}

impl<W: Write> AsciicastWriter<W> {
    /// Wrap a sink.
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write the header line.
    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        let json = encode_header(header)?;
        CastError::with_io_context(
            writeln!(self.inner, "{json}"),
            "writing asciicast header",
        )
    }

    /// Write one event line.
    pub fn write_event(&mut self, event: &Event) -> Result<()> {
        let json = encode_event(event)?;
        CastError::with_io_context(writeln!(self.inner, "{json}"), "writing asciicast event")
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        CastError::with_io_context(self.inner.flush(), "flushing asciicast output")
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
