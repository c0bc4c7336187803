//! Asciicast v2 and v3 headers.
//!
//! The two schemas are a closed set: [`Header`] is an enum over exactly
//! the supported versions, and decoding fails fast on any other version
//! tag. Accessors on [`Header`] expose the fields both schemas share so
//! callers never match on the version unless they need to.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::error::{CastError, Result};

/// Environment captured with a recording (`env` object).
pub type Env = BTreeMap<String, String>;

/// Terminal colour theme (`fg`, `bg`, `palette`).
pub type Theme = BTreeMap<String, String>;

/// Supported asciicast format versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CastVersion {
    /// Version 2: absolute event times.
    #[default]
    V2,
    /// Version 3: event times relative to the previous event.
    V3,
}

impl CastVersion {
    /// The numeric version tag.
    #[must_use]
    pub const fn number(self) -> i64 {
        match self {
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }

    /// Look up a numeric version tag.
    #[must_use]
    pub const fn from_number(version: i64) -> Option<Self> {
        match version {
            2 => Some(Self::V2),
            3 => Some(Self::V3),
            _ => None,
        }
    }

    /// Whether event times in this version are deltas.
    #[must_use]
    pub const fn uses_relative_event_time(self) -> bool {
        matches!(self, Self::V3)
    }
}

fn nullable_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Asciicast v2 header fields (everything except `version`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderV2 {
    /// Terminal width in columns.
    pub width: u32,
    /// Terminal height in rows.
    pub height: u32,
    /// Recording start, Unix epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Total duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Recorded command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Recording title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Maximum idle time between events during playback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_time_limit: Option<f64>,
    /// Captured environment; `TERM` holds the terminal type.
    #[serde(default, deserialize_with = "nullable_map")]
    pub env: Env,
    /// Colour theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// The `term` block of an asciicast v3 header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInfo {
    /// Terminal width in columns.
    pub cols: u32,
    /// Terminal height in rows.
    pub rows: u32,
    /// Terminal type, e.g. `xterm-256color`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub term_type: Option<String>,
    /// Terminal program version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Colour theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// Asciicast v3 header fields (everything except `version`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderV3 {
    /// Terminal description.
    pub term: TermInfo,
    /// Recording start, Unix epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Total duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Recorded command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Recording title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Maximum idle time between events during playback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_time_limit: Option<f64>,
    /// Captured environment.
    #[serde(default, deserialize_with = "nullable_map")]
    pub env: Env,
}

/// An asciicast header of a supported version.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    /// Version 2 header.
    V2(HeaderV2),
    /// Version 3 header.
    V3(HeaderV3),
}

impl Header {
    /// Create a header with the given geometry and no optional fields.
    #[must_use]
    pub fn new(version: CastVersion, width: u32, height: u32) -> Self {
        match version {
            CastVersion::V2 => Self::V2(HeaderV2 {
                width,
                height,
                timestamp: None,
                duration: None,
                command: None,
                title: None,
                idle_time_limit: None,
                env: Env::new(),
                theme: None,
            }),
            CastVersion::V3 => Self::V3(HeaderV3 {
                term: TermInfo {
                    cols: width,
                    rows: height,
                    term_type: None,
                    version: None,
                    theme: None,
                },
                timestamp: None,
                duration: None,
                command: None,
                title: None,
                idle_time_limit: None,
                env: Env::new(),
            }),
        }
    }

    /// Set the terminal type.
    ///
    /// Version 2 stores it as `env.TERM`; version 3 as `term.type`.
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        match &mut self {
            Self::V2(h) => {
                h.env.insert("TERM".to_string(), term);
            }
            Self::V3(h) => h.term.term_type = Some(term),
        }
        self
    }

    /// Set the recording start timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        match &mut self {
            Self::V2(h) => h.timestamp = Some(timestamp),
            Self::V3(h) => h.timestamp = Some(timestamp),
        }
        self
    }

    /// Set the recorded command.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        let command = Some(command.into());
        match &mut self {
            Self::V2(h) => h.command = command,
            Self::V3(h) => h.command = command,
        }
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = Some(title.into());
        match &mut self {
            Self::V2(h) => h.title = title,
            Self::V3(h) => h.title = title,
        }
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        match &mut self {
            Self::V2(h) => h.env.insert(key, value),
            Self::V3(h) => h.env.insert(key, value),
        };
        self
    }

    /// The format version.
    #[must_use]
    pub const fn version(&self) -> CastVersion {
        match self {
            Self::V2(_) => CastVersion::V2,
            Self::V3(_) => CastVersion::V3,
        }
    }

    /// Terminal width in columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        match self {
            Self::V2(h) => h.width,
            Self::V3(h) => h.term.cols,
        }
    }

    /// Terminal height in rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        match self {
            Self::V2(h) => h.height,
            Self::V3(h) => h.term.rows,
        }
    }

    /// Terminal type, if recorded.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::V2(h) => h.env.get("TERM").map(String::as_str),
            Self::V3(h) => h.term.term_type.as_deref(),
        }
    }

    /// Recording start, Unix epoch seconds.
    #[must_use]
    pub const fn timestamp(&self) -> Option<i64> {
        match self {
            Self::V2(h) => h.timestamp,
            Self::V3(h) => h.timestamp,
        }
    }

    /// Total duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> Option<f64> {
        match self {
            Self::V2(h) => h.duration,
            Self::V3(h) => h.duration,
        }
    }

    /// Recorded command.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::V2(h) => h.command.as_deref(),
            Self::V3(h) => h.command.as_deref(),
        }
    }

    /// Recording title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::V2(h) => h.title.as_deref(),
            Self::V3(h) => h.title.as_deref(),
        }
    }

    /// Idle time limit in seconds.
    #[must_use]
    pub const fn idle_time_limit(&self) -> Option<f64> {
        match self {
            Self::V2(h) => h.idle_time_limit,
            Self::V3(h) => h.idle_time_limit,
        }
    }

    /// Captured environment.
    #[must_use]
    pub const fn env(&self) -> &Env {
        match self {
            Self::V2(h) => &h.env,
            Self::V3(h) => &h.env,
        }
    }

    /// Colour theme.
    #[must_use]
    pub const fn theme(&self) -> Option<&Theme> {
        match self {
            Self::V2(h) => h.theme.as_ref(),
            Self::V3(h) => h.term.theme.as_ref(),
        }
    }

    /// Whether event times are deltas from the previous event.
    #[must_use]
    pub const fn uses_relative_event_time(&self) -> bool {
        self.version().uses_relative_event_time()
    }
}

/// Serialized form: the version tag followed by the version's fields.
#[derive(Serialize)]
struct Tagged<'a, T> {
    version: i64,
    #[serde(flatten)]
    fields: &'a T,
}

impl Serialize for Header {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let version = self.version().number();
        match self {
            Self::V2(fields) => Tagged { version, fields }.serialize(serializer),
            Self::V3(fields) => Tagged { version, fields }.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: i64,
}

/// Decode a header line.
///
/// Only the `version` field is inspected first; the rest is decoded with
/// that version's schema.
pub fn decode_header(raw: &[u8]) -> Result<Header> {
    let probe: VersionProbe = serde_json::from_slice(raw)?;
    let header = match CastVersion::from_number(probe.version) {
        Some(CastVersion::V2) => Header::V2(serde_json::from_slice(raw)?),
        Some(CastVersion::V3) => Header::V3(serde_json::from_slice(raw)?),
        None => {
            return Err(CastError::UnsupportedVersion {
                version: probe.version,
            });
        }
    };
    trace!(version = probe.version, "decoded asciicast header");
    Ok(header)
}

/// Encode a header as a single JSON line (without the trailing newline).
pub fn encode_header(header: &Header) -> Result<String> {
    Ok(serde_json::to_string(header)?)
}
