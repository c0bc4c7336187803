//! Timing-file records and their typescript payloads.
//!
//! Each timing line describes one event and announces how many payload
//! bytes follow in the typescript:
//!
//! ```text
//! 0.123456 42        classic: elapsed length (always output)
//! O 0.123456 42      advanced: code elapsed length
//! ```
//!
//! Both dialects are read; only the advanced one is written.

use std::io::{BufRead, Read, Write};

use crate::error::{CastError, Result};
use crate::types::Direction;

/// Initial payload buffer size; larger payloads grow as bytes arrive.
const PAYLOAD_CHUNK: usize = 64 * 1024;

/// Timing-file dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingFormat {
    /// `elapsed length`, output only.
    Classic,
    /// `code elapsed length`.
    Advanced,
}

/// One parsed timing line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingRecord {
    /// Dialect the line was written in.
    pub format: TimingFormat,
    /// Event code; `'O'` for classic lines.
    pub code: char,
    /// Seconds since the previous event.
    pub elapsed: f64,
    /// Payload length in bytes.
    pub length: usize,
}

impl TimingRecord {
    /// Parse a timing line. A trailing line ending is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        let fields: Vec<&str> = trimmed.split_ascii_whitespace().collect();

        let advanced = trimmed.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        let (format, code, elapsed, length) = match (advanced, fields.as_slice()) {
            (_, []) => return Err(CastError::invalid_timing(trimmed, "empty record")),
            (true, [code, elapsed, length]) => {
                let mut chars = code.chars();
                let (Some(code), None) = (chars.next(), chars.next()) else {
                    return Err(CastError::invalid_timing(
                        trimmed,
                        "event code must be a single character",
                    ));
                };
                (TimingFormat::Advanced, code, *elapsed, *length)
            }
            (false, [elapsed, length]) => (
                TimingFormat::Classic,
                Direction::Output.script_code(),
                *elapsed,
                *length,
            ),
            (true, _) => {
                return Err(CastError::invalid_timing(
                    trimmed,
                    "expected 'code elapsed length'",
                ));
            }
            (false, _) => {
                return Err(CastError::invalid_timing(trimmed, "expected 'elapsed length'"));
            }
        };

        let elapsed: f64 = elapsed
            .parse()
            .ok()
            .filter(|e: &f64| e.is_finite())
            .ok_or_else(|| CastError::invalid_timing(trimmed, "invalid elapsed time"))?;
        let length: i64 = length
            .parse()
            .map_err(|_| CastError::invalid_timing(trimmed, "invalid length"))?;
        if length < 0 {
            return Err(CastError::NegativeLength { length });
        }
        let length = usize::try_from(length)
            .map_err(|_| CastError::invalid_timing(trimmed, "length out of range"))?;

        Ok(Self {
            format,
            code,
            elapsed,
            length,
        })
    }
}

/// A script event: one timing record plus its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event code (`'O'` output, `'I'` input, others preserved as read).
    pub code: char,
    /// Seconds since the previous event.
    pub elapsed: f64,
    /// Raw payload bytes.
    pub data: Vec<u8>,
}

impl Event {
    /// Create an event.
    #[must_use]
    pub fn new(code: char, elapsed: f64, data: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            elapsed,
            data: data.into(),
        }
    }

    /// Create an output event.
    #[must_use]
    pub fn output(elapsed: f64, data: impl Into<Vec<u8>>) -> Self {
        Self::new(Direction::Output.script_code(), elapsed, data)
    }

    /// Create an input event.
    #[must_use]
    pub fn input(elapsed: f64, data: impl Into<Vec<u8>>) -> Self {
        Self::new(Direction::Input.script_code(), elapsed, data)
    }

    /// The direction of this event, if its code has one.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        Direction::from_script_code(self.code)
    }
}

/// Read exactly `length` payload bytes.
fn read_payload<R: Read>(typescript: &mut R, length: usize) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(length.min(PAYLOAD_CHUNK));
    let read = CastError::with_io_context(
        typescript.take(length as u64).read_to_end(&mut data),
        "reading typescript payload",
    )?;
    if read < length {
        return Err(CastError::ShortRead {
            expected: length,
            read,
        });
    }
    Ok(data)
}

/// Read the next event.
///
/// Returns `Ok(None)` when the timing source is exhausted. Any other
/// problem, including a typescript that ends inside a payload, is an error.
pub fn read_event<R: Read, T: BufRead>(typescript: &mut R, timing: &mut T) -> Result<Option<Event>> {
    let mut raw = Vec::new();
    let n = CastError::with_io_context(timing.read_until(b'\n', &mut raw), "reading timing record")?;
    if n == 0 {
        return Ok(None);
    }

    let line = String::from_utf8(raw).map_err(|e| {
        CastError::invalid_timing(
            String::from_utf8_lossy(e.as_bytes()),
            "record is not valid UTF-8",
        )
    })?;
    let record = TimingRecord::parse(&line)?;
    let data = read_payload(typescript, record.length)?;

    Ok(Some(Event {
        code: record.code,
        elapsed: record.elapsed,
        data,
    }))
}

/// Write an event in the advanced timing format.
///
/// The timing line is written first, then the payload.
pub fn write_event<W: Write, T: Write>(event: &Event, typescript: &mut W, timing: &mut T) -> Result<()> {
    CastError::with_io_context(
        writeln!(timing, "{} {:.6} {}", event.code, event.elapsed, event.data.len()),
        "writing timing record",
    )?;
    CastError::with_io_context(typescript.write_all(&event.data), "writing typescript payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classic() {
        let record = TimingRecord::parse("0.523412 17\n").unwrap();
        assert_eq!(record.format, TimingFormat::Classic);
        assert_eq!(record.code, 'O');
        assert!((record.elapsed - 0.523_412).abs() < 1e-9);
        assert_eq!(record.length, 17);
    }

    #[test]
    fn parse_advanced() {
        let record = TimingRecord::parse("I 1.5 3").unwrap();
        assert_eq!(record.format, TimingFormat::Advanced);
        assert_eq!(record.code, 'I');
        assert_eq!(record.length, 3);
    }

    #[test]
    fn parse_preserves_unknown_code() {
        let record = TimingRecord::parse("R 0.25 0\r\n").unwrap();
        assert_eq!(record.code, 'R');
        assert_eq!(record.length, 0);
    }

    #[test]
    fn negative_length() {
        let err = TimingRecord::parse("O 0.1 -4").unwrap_err();
        assert!(matches!(err, CastError::NegativeLength { length: -4 }));
    }

    #[test]
    fn malformed_records() {
        for line in [
            "\n",
            "   \n",
            "O 0.1",
            "O 0.1 4 extra",
            "OX 0.1 4",
            "0.1",
            "0.1 4 5",
            "o 0.1 4",
            "O abc 4",
            "O inf 4",
            "O 0.1 4.5",
        ] {
            assert!(
                matches!(TimingRecord::parse(line), Err(CastError::InvalidTiming { .. })),
                "accepted {line:?}"
            );
        }
    }

    #[test]
    fn read_classic_and_advanced() {
        let mut typescript: &[u8] = b"hello\nls\r";
        let mut timing: &[u8] = b"0.5 6\nI 1.25 3\n";

        let first = read_event(&mut typescript, &mut timing).unwrap().unwrap();
        assert_eq!(first, Event::output(0.5, b"hello\n".to_vec()));

        let second = read_event(&mut typescript, &mut timing).unwrap().unwrap();
        assert_eq!(second, Event::input(1.25, b"ls\r".to_vec()));

        assert!(read_event(&mut typescript, &mut timing).unwrap().is_none());
    }

    #[test]
    fn read_last_line_without_newline() {
        let mut typescript: &[u8] = b"abc";
        let mut timing: &[u8] = b"O 0.1 3";
        let event = read_event(&mut typescript, &mut timing).unwrap().unwrap();
        assert_eq!(event.data, b"abc");
    }

    #[test]
    fn short_payload_is_an_error() {
        let mut typescript: &[u8] = b"ab";
        let mut timing: &[u8] = b"O 0.1 5\n";
        let err = read_event(&mut typescript, &mut timing).unwrap_err();
        assert!(matches!(
            err,
            CastError::ShortRead {
                expected: 5,
                read: 2
            }
        ));
    }

    #[test]
    fn binary_payload() {
        let payload = vec![0x00, 0xff, b'\n', 0xc3, 0x28];
        let mut typescript = Vec::new();
        let mut timing = Vec::new();
        write_event(&Event::output(0.0, payload.clone()), &mut typescript, &mut timing).unwrap();

        assert_eq!(timing, b"O 0.000000 5\n");
        let event = read_event(&mut typescript.as_slice(), &mut timing.as_slice())
            .unwrap()
            .unwrap();
        assert_eq!(event.data, payload);
    }

    #[test]
    fn write_uses_advanced_form() {
        let mut typescript = Vec::new();
        let mut timing = Vec::new();
        write_event(&Event::input(1.23, "word"), &mut typescript, &mut timing).unwrap();
        write_event(&Event::new('R', 0.5, ""), &mut typescript, &mut timing).unwrap();

        assert_eq!(String::from_utf8(timing).unwrap(), "I 1.230000 4\nR 0.500000 0\n");
        assert_eq!(typescript, b"word");
    }
}
