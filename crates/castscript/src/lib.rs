//! castscript: convert terminal recordings between asciicast and `script(1)`
//!
//! This crate reads and writes two terminal-session recording formats and
//! converts between them in a single streaming pass:
//!
//! - **asciicast** (versions 2 and 3): newline-delimited JSON, one header
//!   object followed by `[time, code, data]` event arrays.
//! - **script**: the typescript and timing-file pair produced by
//!   `script(1)` from util-linux, in the advanced (`O`/`I`) or classic
//!   timing format.
//!
//! # Features
//!
//! - **Streaming I/O** over any `BufRead`/`Write`; nothing is buffered
//!   beyond the current event
//! - **Both asciicast versions**, with absolute (v2) or relative (v3)
//!   event times
//! - **Direction filtering**: resize and marker events are dropped, input
//!   and output events keep their timing
//!
//! # Example
//!
//! ```
//! use castscript::prelude::*;
//!
//! let cast = "{\"version\": 2, \"width\": 80, \"height\": 24}\n[0.5, \"o\", \"hi\"]\n";
//! let (mut typescript, mut timing) = (Vec::new(), Vec::new());
//! let stats = asciicast_to_script(
//!     cast.as_bytes(),
//!     &mut typescript,
//!     &mut timing,
//!     &ConvertConfig::new(),
//! )?;
//! assert_eq!(stats.events_written, 1);
//! assert_eq!(timing, b"O 0.500000 2\n");
//! # Ok::<(), CastError>(())
//! ```

pub mod asciicast;
pub mod config;
pub mod convert;
pub mod error;
pub mod prelude;
pub mod script;
pub mod types;

pub use asciicast::{AsciicastReader, AsciicastWriter, CastVersion};
pub use config::{ConvertConfig, EnvConfig, LogFormat, LoggingConfig, SourceTiming};
pub use convert::{ConversionStats, asciicast_to_script, script_to_asciicast};
pub use error::{CastError, Result};
pub use script::{ScriptReader, ScriptWriter};
pub use types::Direction;
