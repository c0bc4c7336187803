//! Error types for castscript.
//!
//! Every failure aborts the conversion that produced it. Errors fall into
//! three groups: structural problems with the input (malformed headers,
//! event lines, or timing records), unsupported asciicast versions, and
//! I/O failures from the underlying streams. A clean end of stream at a
//! record boundary is not an error; readers report it as `Ok(None)`.

use thiserror::Error;

/// Maximum number of characters of an offending line echoed in an error.
const MAX_LINE_DISPLAY: usize = 120;

/// Shorten a line for display in an error message.
fn truncate_line(line: &str) -> String {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.chars().count() <= MAX_LINE_DISPLAY {
        return line.to_string();
    }
    let head: String = line.chars().take(MAX_LINE_DISPLAY).collect();
    format!("{head}...")
}

/// The main error type for castscript operations.
#[derive(Debug, Error)]
pub enum CastError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    IoWithContext {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The payload stream ended before a record's bytes were all read.
    #[error("short read from typescript: expected {expected} bytes, got {read}")]
    ShortRead {
        /// Byte count announced by the timing record.
        expected: usize,
        /// Bytes actually available.
        read: usize,
    },

    /// Malformed JSON in an asciicast header or event line.
    #[error("malformed asciicast JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The asciicast header declares a version other than 2 or 3.
    #[error("asciicast v{version} is unsupported")]
    UnsupportedVersion {
        /// The declared version.
        version: i64,
    },

    /// An asciicast event line is not a JSON array.
    #[error("asciicast event is not an array")]
    EventShape,

    /// An asciicast event array does not have exactly three elements.
    #[error("expected 3 fields in event, got {found}")]
    EventArity {
        /// The number of elements found.
        found: usize,
    },

    /// An asciicast event element has the wrong JSON type.
    #[error("wrong type for event {field} field")]
    EventFieldType {
        /// Which element was wrong ("time", "code" or "data").
        field: &'static str,
    },

    /// The script header line does not match the expected grammar.
    #[error("improper script header structure: {}", truncate_line(line))]
    InvalidHeader {
        /// The offending header line.
        line: String,
    },

    /// The script header line is not valid UTF-8.
    #[error("script header is not valid UTF-8")]
    InvalidUtf8Header(#[source] std::string::FromUtf8Error),

    /// The script header start date could not be parsed.
    #[error("invalid script start date: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    /// A timing-file record is malformed.
    #[error("invalid timing record '{}': {reason}", truncate_line(line))]
    InvalidTiming {
        /// The offending timing line.
        line: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A timing-file record announces a negative payload length.
    #[error("negative event length in timing file: {length}")]
    NegativeLength {
        /// The parsed length.
        length: i64,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Result type alias for castscript operations.
pub type Result<T> = std::result::Result<T, CastError>;

impl CastError {
    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoWithContext {
            context: context.into(),
            source,
        }
    }

    /// Wrap an I/O result with context.
    pub fn with_io_context<T>(result: std::io::Result<T>, context: impl Into<String>) -> Result<T> {
        result.map_err(|e| Self::io_context(context, e))
    }

    /// Create an invalid script header error.
    pub fn invalid_header(line: impl Into<String>) -> Self {
        Self::InvalidHeader { line: line.into() }
    }

    /// Create an invalid timing record error.
    pub fn invalid_timing(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTiming {
            line: line.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is an I/O error, including short reads.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::IoWithContext { .. } | Self::ShortRead { .. }
        )
    }

    /// Check if this is an unsupported version error.
    #[must_use]
    pub const fn is_version(&self) -> bool {
        matches!(self, Self::UnsupportedVersion { .. })
    }

    /// Check if this error describes malformed input.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !self.is_io() && !self.is_version() && !matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_version_names_version() {
        let err = CastError::UnsupportedVersion { version: 5 };
        assert_eq!(err.to_string(), "asciicast v5 is unsupported");
        assert!(err.is_version());
        assert!(!err.is_structural());
    }

    #[test]
    fn arity_message() {
        let err = CastError::EventArity { found: 2 };
        assert_eq!(err.to_string(), "expected 3 fields in event, got 2");
        assert!(err.is_structural());
    }

    #[test]
    fn io_context_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = CastError::io_context("opening timingfile", io_err);
        assert_eq!(err.to_string(), "opening timingfile: missing");
        assert!(err.is_io());
    }

    #[test]
    fn short_read_is_io() {
        let err = CastError::ShortRead {
            expected: 10,
            read: 4,
        };
        assert!(err.is_io());
        assert!(err.to_string().contains("expected 10 bytes, got 4"));
    }

    #[test]
    fn long_lines_are_truncated() {
        let line = "x".repeat(500);
        let err = CastError::invalid_timing(line, "bad");
        let msg = err.to_string();
        assert!(msg.contains("..."));
        assert!(msg.len() < 200);
    }

    #[test]
    fn trailing_newline_not_echoed() {
        let err = CastError::invalid_header("Script started\n");
        assert_eq!(
            err.to_string(),
            "improper script header structure: Script started"
        );
    }
}
