//! Configuration types for castscript.
//!
//! [`ConvertConfig`] controls how a conversion interprets and produces
//! event times; [`LoggingConfig`] describes how front ends should set up
//! diagnostics.

pub mod env;

use std::fmt;
use std::str::FromStr;

pub use env::EnvConfig;

use crate::asciicast::CastVersion;
use crate::error::CastError;

/// Default log filter when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// How asciicast event times are interpreted when converting to script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceTiming {
    /// Follow the header: v2 times are absolute, v3 times are deltas.
    #[default]
    FromHeader,
    /// Treat every source time as absolute, whatever the header says.
    Absolute,
}

impl SourceTiming {
    /// Whether a source with the given header flag carries deltas.
    #[must_use]
    pub const fn is_relative(self, header_relative: bool) -> bool {
        match self {
            Self::FromHeader => header_relative,
            Self::Absolute => false,
        }
    }
}

/// Per-conversion options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertConfig {
    /// Interpretation of asciicast source times.
    pub source_timing: SourceTiming,
    /// Asciicast version produced from script input.
    pub cast_version: CastVersion,
}

impl ConvertConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source timing mode.
    #[must_use]
    pub const fn source_timing(mut self, source_timing: SourceTiming) -> Self {
        self.source_timing = source_timing;
        self
    }

    /// Set the asciicast output version.
    #[must_use]
    pub const fn cast_version(mut self, cast_version: CastVersion) -> Self {
        self.cast_version = cast_version;
        self
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Compact,
    /// One JSON object per record.
    Json,
}

impl FromStr for LogFormat {
    type Err = CastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(CastError::Config {
                message: format!("unknown log format '{other}'"),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `warn` or `castscript=debug`.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `RUST_LOG`, then `<PREFIX>_LOG`, then fall back to the level
    /// for `verbosity`. The format comes from `<PREFIX>_LOG_FORMAT`.
    ///
    /// An unparseable format falls back to the default.
    #[must_use]
    pub fn from_env(env: &EnvConfig, verbosity: u8) -> Self {
        let filter = EnvConfig::new("")
            .get("rust_log")
            .or_else(|| env.get("log"))
            .unwrap_or_else(|| Self::level_for_verbosity(verbosity).to_string());
        let format = env.parse("log_format").unwrap_or_default();
        Self { filter, format }
    }

    /// Map a `-v` count to a level, used when no filter was configured.
    #[must_use]
    pub const fn level_for_verbosity(verbosity: u8) -> &'static str {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Set the filter directive.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set the output format.
    #[must_use]
    pub const fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}
