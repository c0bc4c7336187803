//! The `script(1)` recording format.
//!
//! A recording is two parallel streams:
//!
//! - the **typescript**: a header line followed by the raw bytes of every
//!   event, concatenated without delimiters;
//! - the **timing file**: one line per event giving its code, the elapsed
//!   time since the previous event, and its byte length in the typescript.
//!
//! The streams must be consumed in lockstep; [`ScriptReader`] and
//! [`ScriptWriter`] keep the pair together.

pub mod event;
pub mod header;

use std::io::{BufRead, Write};

pub use event::{Event, TimingFormat, TimingRecord, read_event, write_event};
pub use header::{Header, NOT_A_TERMINAL, START_FORMAT, unknown_start};

use crate::error::{CastError, Result};

/// Reads a typescript and its timing file together.
#[derive(Debug)]
pub struct ScriptReader<R, T> {
    typescript: R,
    timing: T,
}

impl<R: BufRead, T: BufRead> ScriptReader<R, T> {
    /// Pair a typescript with its timing file.
    pub const fn new(typescript: R, timing: T) -> Self {
        Self { typescript, timing }
    }

    /// Read the typescript header line.
    ///
    /// Returns `Ok(None)` if the typescript is empty.
    pub fn read_header(&mut self) -> Result<Option<Header>> {
        let mut raw = Vec::new();
        let n = CastError::with_io_context(
            self.typescript.read_until(b'\n', &mut raw),
            "reading typescript header",
        )?;
        if n == 0 {
            return Ok(None);
        }
        let line = String::from_utf8(raw).map_err(CastError::InvalidUtf8Header)?;
        Header::parse(&line).map(Some)
    }

    /// Read the next event; `Ok(None)` once the timing file is exhausted.
    pub fn read_event(&mut self) -> Result<Option<Event>> {
        read_event(&mut self.typescript, &mut self.timing)
    }

    /// Consume the reader and return both sources.
    pub fn into_inner(self) -> (R, T) {
        (self.typescript, self.timing)
    }
}

impl<R: BufRead, T: BufRead> Iterator for ScriptReader<R, T> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_event().transpose()
    }
}

/// Writes a typescript and its timing file together.
#[derive(Debug)]
pub struct ScriptWriter<W, T> {
    typescript: W,
    timing: T,
}

impl<W: Write, T: Write> ScriptWriter<W, T> {
    /// Pair a typescript sink with a timing sink.
    pub const fn new(typescript: W, timing: T) -> Self {
        Self { typescript, timing }
    }

    /// Write the header line to the typescript.
    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        CastError::with_io_context(
            writeln!(self.typescript, "{header}"),
            "writing typescript header",
        )
    }

    /// Write one event in the advanced timing format.
    pub fn write_event(&mut self, event: &Event) -> Result<()> {
        write_event(event, &mut self.typescript, &mut self.timing)
    }

    /// Flush both sinks.
    pub fn flush(&mut self) -> Result<()> {
        CastError::with_io_context(self.typescript.flush(), "flushing typescript")?;
        CastError::with_io_context(self.timing.flush(), "flushing timing file")
    }

    /// Consume the writer and return both sinks.
    pub fn into_inner(self) -> (W, T) {
        (self.typescript, self.timing)
    }
}
