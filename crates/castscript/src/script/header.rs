//! The `Script started on ...` header line of a typescript.
//!
//! Shape of the line:
//!
//! ```text
//! Script started on 2025-04-01 12:34:56-07:00 [COMMAND="..." TERM="..." TTY="..." COLUMNS="80" LINES="24"]
//! Script started on 2025-04-01 12:34:56-07:00 [COMMAND="..." <not executed on terminal>]
//! ```
//!
//! Quotes inside the `COMMAND` value are not escaped, so the command is
//! captured as the shortest prefix after which the remaining fields still
//! match. Quotes inside `TERM` and `TTY` always terminate the value.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use regex::Regex;

use crate::error::{CastError, Result};

/// Date format of the header start time, e.g. `2025-04-01 12:34:56+05:00`.
pub const START_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Marker written instead of geometry when no terminal was attached.
pub const NOT_A_TERMINAL: &str = "<not executed on terminal>";

static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^Script started on ",
        r"(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}[+-][0-9]{2}:[0-9]{2}) \[",
        r#"(?:COMMAND="(?P<command>.*?)" )?"#,
        r#"(?:TERM="(?P<term>[^"]*)" )?"#,
        r#"(?:TTY="(?P<tty>[^"]*)" )?"#,
        r#"(?:COLUMNS="(?P<columns>[0-9]+)" LINES="(?P<lines>[0-9]+)"|<not executed on terminal>)"#,
        r"\]$",
    ))
    .expect("script header pattern is a valid regex")
});

/// Start time written when the recording start is unknown:
/// `0001-01-01 00:00:00+00:00`.
#[must_use]
pub fn unknown_start() -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|start| start.and_utc())
        .unwrap_or_default()
        .fixed_offset()
}

/// A parsed script header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Recording start, with the offset it was written in.
    pub start: DateTime<FixedOffset>,
    /// Recorded command.
    pub command: Option<String>,
    /// Terminal type.
    pub term: Option<String>,
    /// Terminal device path.
    pub tty: Option<String>,
    /// Terminal width; zero when not executed on a terminal.
    pub columns: u32,
    /// Terminal height; zero when not executed on a terminal.
    pub lines: u32,
}

impl Header {
    /// Create a header with only a start time.
    #[must_use]
    pub const fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            command: None,
            term: None,
            tty: None,
            columns: 0,
            lines: 0,
        }
    }

    /// Create a header starting at the given Unix timestamp, in UTC.
    ///
    /// Timestamps outside the representable range fall back to
    /// [`unknown_start`].
    #[must_use]
    pub fn from_timestamp(timestamp: i64) -> Self {
        let start = DateTime::<Utc>::from_timestamp(timestamp, 0)
            .map_or_else(unknown_start, |start| start.fixed_offset());
        Self::new(start)
    }

    /// Set the command.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set the terminal type.
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Set the terminal device.
    #[must_use]
    pub fn with_tty(mut self, tty: impl Into<String>) -> Self {
        self.tty = Some(tty.into());
        self
    }

    /// Set the terminal geometry.
    #[must_use]
    pub const fn with_geometry(mut self, columns: u32, lines: u32) -> Self {
        self.columns = columns;
        self.lines = lines;
        self
    }

    /// Whether the header carries terminal geometry.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.columns != 0 && self.lines != 0
    }

    /// Parse a header line. A trailing line ending is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        let caps = HEADER_PATTERN
            .captures(trimmed)
            .ok_or_else(|| CastError::invalid_header(trimmed))?;

        let start = DateTime::parse_from_str(&caps["date"], START_FORMAT)?;
        let geometry = |name: &str| -> Result<u32> {
            caps.name(name).map_or(Ok(0), |m| {
                m.as_str()
                    .parse()
                    .map_err(|_| CastError::invalid_header(trimmed))
            })
        };

        Ok(Self {
            start,
            command: caps.name("command").map(|m| m.as_str().to_string()),
            term: caps.name("term").map(|m| m.as_str().to_string()),
            tty: caps.name("tty").map(|m| m.as_str().to_string()),
            columns: geometry("columns")?,
            lines: geometry("lines")?,
        })
    }
}

impl FromStr for Header {
    type Err = CastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script started on {} [", self.start.format(START_FORMAT))?;

        let mut spacer = "";
        if let Some(command) = &self.command {
            write!(f, r#"{spacer}COMMAND="{command}""#)?;
            spacer = " ";
        }
        if let Some(term) = &self.term {
            write!(f, r#"{spacer}TERM="{term}""#)?;
            spacer = " ";
        }
        if let Some(tty) = &self.tty {
            write!(f, r#"{spacer}TTY="{tty}""#)?;
            spacer = " ";
        }
        if self.is_terminal() {
            write!(
                f,
                r#"{spacer}COLUMNS="{}" LINES="{}""#,
                self.columns, self.lines
            )?;
        } else {
            write!(f, "{spacer}{NOT_A_TERMINAL}")?;
        }

        write!(f, "]")
    }
}
