//! Convenient re-exports for common castscript usage.
//!
//! ```
//! use castscript::prelude::*;
//!
//! let config = ConvertConfig::new().cast_version(CastVersion::V3);
//! assert!(config.cast_version.uses_relative_event_time());
//! ```

// Configuration
pub use crate::config::{ConvertConfig, LogFormat, LoggingConfig, SourceTiming};

// Error handling
pub use crate::error::{CastError, Result};

// Conversion
pub use crate::convert::{ConversionStats, asciicast_to_script, script_to_asciicast};

// Format readers and writers
pub use crate::asciicast::{AsciicastReader, AsciicastWriter, CastVersion};
pub use crate::script::{ScriptReader, ScriptWriter};

pub use crate::types::Direction;
