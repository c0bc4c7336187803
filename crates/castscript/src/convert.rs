//! Streaming conversion between asciicast and script recordings.
//!
//! Both directions are a single forward pass: read the source header,
//! write the destination header, then translate one event at a time.
//! Memory use does not depend on the length of the recording.
//!
//! Events whose code has no [`Direction`](crate::types::Direction)
//! (resize, marker, ...) are dropped. Deltas written to a timing file are
//! measured from the previous written event; asciicast v2 times count every
//! event read, and asciicast v3 times are the source elapsed values as read.
//!
//! An error aborts the conversion immediately. Whatever was written up to
//! that point stays in the sinks; callers that need atomic output must
//! arrange it themselves.

use std::io::{BufRead, Write};

use tracing::{debug, trace};

use crate::asciicast::{self, AsciicastReader, AsciicastWriter, CastVersion};
use crate::config::ConvertConfig;
use crate::error::Result;
use crate::script::{self, ScriptReader, ScriptWriter};

/// Counters reported by a finished conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Events read from the source.
    pub events_read: u64,
    /// Events written to the destination.
    pub events_written: u64,
    /// Events dropped because their code has no direction.
    pub events_dropped: u64,
}

/// Build the script header for an asciicast header.
#[must_use]
pub fn script_header_for(header: &asciicast::Header) -> script::Header {
    let start = header.timestamp().map_or_else(script::unknown_start, |ts| {
        script::Header::from_timestamp(ts).start
    });
    let mut out = script::Header::new(start).with_geometry(header.width(), header.height());
    if let Some(term) = header.term() {
        out = out.with_term(term);
    }
    if let Some(command) = header.command() {
        out = out.with_command(command);
    }
    out
}

/// Build the asciicast header for a script header.
#[must_use]
pub fn cast_header_for(header: &script::Header, version: CastVersion) -> asciicast::Header {
    let mut out = asciicast::Header::new(version, header.columns, header.lines)
        .with_timestamp(header.start.timestamp());
    if let Some(term) = header.term.as_deref().filter(|t| !t.is_empty()) {
        out = out.with_env("TERM", term).with_term(term);
    }
    if let Some(command) = header.command.as_deref().filter(|c| !c.is_empty()) {
        out = out.with_command(command);
    }
    out
}

/// Convert an asciicast stream into a typescript and timing file.
///
/// Source times are read as absolute or relative according to
/// [`ConvertConfig::source_timing`]; the timing file always receives the
/// elapsed time since the previous written event.
pub fn asciicast_to_script<R, W, T>(
    cast: R,
    typescript: W,
    timing: T,
    config: &ConvertConfig,
) -> Result<ConversionStats>
where
    R: BufRead,
    W: Write,
    T: Write,
{
    let mut reader = AsciicastReader::new(cast);
    let mut writer = ScriptWriter::new(typescript, timing);
    let mut stats = ConversionStats::default();

    let Some(header) = reader.read_header()? else {
        debug!("asciicast input is empty");
        return Ok(stats);
    };
    let relative = config
        .source_timing
        .is_relative(header.uses_relative_event_time());
    debug!(
        version = header.version().number(),
        relative, "converting asciicast to script"
    );
    writer.write_header(&script_header_for(&header))?;

    // Absolute sources: time of the last written event.
    let mut last_written = 0.0;
    // Relative sources: deltas of dropped events not yet emitted.
    let mut pending = 0.0;

    while let Some(event) = reader.read_event()? {
        stats.events_read += 1;
        let elapsed = if relative {
            pending + event.time
        } else {
            event.time - last_written
        };

        let Some(direction) = event.direction() else {
            trace!(code = %event.code, "dropping asciicast event");
            stats.events_dropped += 1;
            if relative {
                pending = elapsed;
            }
            continue;
        };

        let out = script::Event::new(direction.script_code(), elapsed, event.data.into_bytes());
        writer.write_event(&out)?;
        stats.events_written += 1;
        pending = 0.0;
        last_written = event.time;
    }

    writer.flush()?;
    debug!(
        read = stats.events_read,
        written = stats.events_written,
        dropped = stats.events_dropped,
        "asciicast to script finished"
    );
    Ok(stats)
}

/// Convert a typescript and timing file into an asciicast stream.
///
/// The output version comes from [`ConvertConfig::cast_version`]: version 2
/// receives accumulated absolute times, version 3 each event's elapsed time
/// unchanged.
pub fn script_to_asciicast<R, T, W>(
    typescript: R,
    timing: T,
    cast: W,
    config: &ConvertConfig,
) -> Result<ConversionStats>
where
    R: BufRead,
    T: BufRead,
    W: Write,
{
    let mut reader = ScriptReader::new(typescript, timing);
    let mut writer = AsciicastWriter::new(cast);
    let mut stats = ConversionStats::default();
    let version = config.cast_version;

    let Some(header) = reader.read_header()? else {
        debug!("typescript is empty");
        return Ok(stats);
    };
    debug!(version = version.number(), "converting script to asciicast");
    writer.write_header(&cast_header_for(&header, version))?;

    // Time since the start of the recording, dropped events included.
    let mut clock = 0.0;

    while let Some(event) = reader.read_event()? {
        stats.events_read += 1;
        clock += event.elapsed;

        let Some(direction) = event.direction() else {
            trace!(code = %event.code, "dropping script event");
            stats.events_dropped += 1;
            continue;
        };

        let time = if version.uses_relative_event_time() {
            event.elapsed
        } else {
            clock
        };
        let data = String::from_utf8(event.data)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
        writer.write_event(&asciicast::Event::new(time, direction.cast_code(), data))?;
        stats.events_written += 1;
    }

    writer.flush()?;
    debug!(
        read = stats.events_read,
        written = stats.events_written,
        dropped = stats.events_dropped,
        "script to asciicast finished"
    );
    Ok(stats)
}
