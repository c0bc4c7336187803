//! asciicast2script - convert an asciicast recording to script(1) format
//!
//! # Usage
//!
//! ```bash
//! # Write ./typescript and ./timingfile
//! asciicast2script demo.cast
//!
//! # Read from stdin, choose output names, replace existing files
//! asciicast2script --typescript out.ts --timingfile out.tm --overwrite - < demo.cast
//!
//! # Replay with util-linux
//! scriptreplay --log-timing timingfile typescript
//! ```

use anyhow::Result;
use castscript_cli::{Asciicast2Script, init_logging, run_asciicast2script};
use clap::Parser;

fn main() -> Result<()> {
    let args = Asciicast2Script::parse();
    init_logging(&args.log.logging_config())?;
    run_asciicast2script(&args)?;
    Ok(())
}
