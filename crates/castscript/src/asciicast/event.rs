//! Asciicast event lines.
//!
//! An event is a JSON array of exactly three elements:
//! `[time, code, data]`, where `time` is a number and `code` and `data`
//! are strings.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{CastError, Result};
use crate::types::Direction;

/// A single asciicast event.
///
/// `time` is absolute (seconds since the recording started) in version 2
/// streams and relative to the previous event in version 3 streams.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event time in seconds.
    pub time: f64,
    /// Event code, e.g. `"o"`, `"i"`, `"r"`, `"m"`.
    pub code: String,
    /// Event data.
    pub data: String,
}

impl Event {
    /// Create an event.
    #[must_use]
    pub fn new(time: f64, code: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            time,
            code: code.into(),
            data: data.into(),
        }
    }

    /// Create an output event.
    #[must_use]
    pub fn output(time: f64, data: impl Into<String>) -> Self {
        Self::new(time, Direction::Output.cast_code(), data)
    }

    /// Create an input event.
    #[must_use]
    pub fn input(time: f64, data: impl Into<String>) -> Self {
        Self::new(time, Direction::Input.cast_code(), data)
    }

    /// The direction of this event, if its code has one.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_cast_code(&self.code)
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.time)?;
        tuple.serialize_element(&self.code)?;
        tuple.serialize_element(&self.data)?;
        tuple.end()
    }
}

/// Whether a raw line is a comment.
///
/// Comments must be filtered out before calling [`decode_event`].
#[must_use]
pub fn is_comment(line: &[u8]) -> bool {
    line.first() == Some(&b'#')
}

/// Decode one event line.
pub fn decode_event(line: &[u8]) -> Result<Event> {
    let Value::Array(items) = serde_json::from_slice::<Value>(line)? else {
        return Err(CastError::EventShape);
    };
    let [time, code, data] = <[Value; 3]>::try_from(items)
        .map_err(|items| CastError::EventArity { found: items.len() })?;

    let time = time
        .as_f64()
        .ok_or(CastError::EventFieldType { field: "time" })?;
    let Value::String(code) = code else {
        return Err(CastError::EventFieldType { field: "code" });
    };
    let Value::String(data) = data else {
        return Err(CastError::EventFieldType { field: "data" });
    };

    Ok(Event { time, code, data })
}

/// Encode an event as a single JSON line (without the trailing newline).
pub fn encode_event(event: &Event) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}
