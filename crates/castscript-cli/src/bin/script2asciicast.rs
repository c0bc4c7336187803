//! script2asciicast - convert a script(1) recording to asciicast
//!
//! # Usage
//!
//! ```bash
//! # Record a session with util-linux script
//! script --log-timing timingfile typescript
//!
//! # Convert ./typescript and ./timingfile to asciicast v2
//! script2asciicast demo.cast
//!
//! # Asciicast v3 on stdout
//! script2asciicast --v3 - | asciinema play -
//! ```

use anyhow::Result;
use castscript_cli::{Script2Asciicast, init_logging, run_script2asciicast};
use clap::Parser;

fn main() -> Result<()> {
    let args = Script2Asciicast::parse();
    init_logging(&args.log.logging_config())?;
    run_script2asciicast(&args)?;
    Ok(())
}
