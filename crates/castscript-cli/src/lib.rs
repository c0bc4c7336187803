//! Shared plumbing for the `asciicast2script` and `script2asciicast` tools.
//!
//! Each binary is a thin `main` around one of the `run_*` functions here:
//! parse arguments, install logging, open the files, convert.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use castscript::asciicast::CastVersion;
use castscript::config::{ConvertConfig, EnvConfig, LogFormat, LoggingConfig, SourceTiming};
use castscript::convert::{ConversionStats, asciicast_to_script, script_to_asciicast};
use clap::{ArgAction, Args, Parser};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Path that stands for standard input or output.
pub const STDIO: &str = "-";

/// Logging options shared by both tools.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format on stderr
    #[arg(long, value_name = "FORMAT", env = "CASTSCRIPT_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl LogArgs {
    /// Resolve the logging configuration from the environment and flags.
    #[must_use]
    pub fn logging_config(&self) -> LoggingConfig {
        let config = LoggingConfig::from_env(&EnvConfig::default(), self.verbose);
        match self.log_format {
            Some(format) => config.format(format),
            None => config,
        }
    }
}

/// Install the global `tracing` subscriber, writing to stderr.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .with_context(|| format!("invalid log filter '{}'", config.filter))?;
    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
    }
    .context("installing log subscriber")
}

/// Open an input file, or standard input for [`STDIO`].
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == STDIO {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Create an output file.
///
/// Without `overwrite` the file must not exist yet; with it, an existing
/// file is truncated.
pub fn create_output(path: &Path, overwrite: bool) -> Result<BufWriter<File>> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    match options.open(path) {
        Ok(file) => Ok(BufWriter::new(file)),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            bail!("{} already exists (use --overwrite)", path.display())
        }
        Err(e) => Err(e).with_context(|| format!("creating {}", path.display())),
    }
}

/// Create an output file, or use standard output for [`STDIO`].
pub fn create_sink(path: &Path, overwrite: bool) -> Result<Box<dyn Write>> {
    if path.as_os_str() == STDIO {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    Ok(Box::new(create_output(path, overwrite)?))
}

/// A typescript and timing file opened together.
///
/// Both files are closed when the pair is dropped, whether or not the
/// conversion succeeded. [`OutputPair::finish`] flushes them and reports
/// any error.
#[derive(Debug)]
pub struct OutputPair {
    typescript: BufWriter<File>,
    timing: BufWriter<File>,
    paths: (PathBuf, PathBuf),
}

impl OutputPair {
    /// Create both files.
    pub fn create(typescript: &Path, timing: &Path, overwrite: bool) -> Result<Self> {
        Ok(Self {
            typescript: create_output(typescript, overwrite)?,
            timing: create_output(timing, overwrite)?,
            paths: (typescript.to_path_buf(), timing.to_path_buf()),
        })
    }

    /// Borrow the typescript and timing writers.
    pub const fn writers(&mut self) -> (&mut BufWriter<File>, &mut BufWriter<File>) {
        (&mut self.typescript, &mut self.timing)
    }

    /// Flush both files.
    pub fn finish(mut self) -> Result<()> {
        self.typescript
            .flush()
            .with_context(|| format!("writing {}", self.paths.0.display()))?;
        self.timing
            .flush()
            .with_context(|| format!("writing {}", self.paths.1.display()))
    }
}

/// Command line of `asciicast2script`.
#[derive(Debug, Parser)]
#[command(name = "asciicast2script")]
#[command(about = "Convert an asciicast recording to a script(1) typescript and timing file")]
#[command(version)]
pub struct Asciicast2Script {
    /// Asciicast file to read, or `-` for standard input
    #[arg(value_name = "ASCIICAST")]
    pub input: PathBuf,

    /// Output typescript file
    #[arg(long, default_value = "typescript")]
    pub typescript: PathBuf,

    /// Output timing file
    #[arg(long, default_value = "timingfile")]
    pub timingfile: PathBuf,

    /// Overwrite existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Treat event times as absolute even for asciicast v3 input
    #[arg(long)]
    pub absolute_time: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

impl Asciicast2Script {
    /// Conversion options selected on the command line.
    #[must_use]
    pub fn convert_config(&self) -> ConvertConfig {
        let timing = if self.absolute_time {
            SourceTiming::Absolute
        } else {
            SourceTiming::FromHeader
        };
        ConvertConfig::new().source_timing(timing)
    }
}

/// Run `asciicast2script`.
pub fn run_asciicast2script(args: &Asciicast2Script) -> Result<ConversionStats> {
    let input = open_input(&args.input)?;
    let mut outputs = OutputPair::create(&args.typescript, &args.timingfile, args.overwrite)?;
    let (typescript, timing) = outputs.writers();

    let stats = asciicast_to_script(input, typescript, timing, &args.convert_config())
        .with_context(|| format!("converting {}", args.input.display()))?;
    outputs.finish()?;

    info!(
        written = stats.events_written,
        dropped = stats.events_dropped,
        typescript = %args.typescript.display(),
        timing = %args.timingfile.display(),
        "wrote script recording"
    );
    Ok(stats)
}

/// Command line of `script2asciicast`.
#[derive(Debug, Parser)]
#[command(name = "script2asciicast")]
#[command(about = "Convert a script(1) typescript and timing file to an asciicast recording")]
#[command(version)]
pub struct Script2Asciicast {
    /// Asciicast file to write, or `-` for standard output
    #[arg(value_name = "OUTFILE")]
    pub output: PathBuf,

    /// Input typescript file
    #[arg(long, default_value = "typescript")]
    pub typescript: PathBuf,

    /// Input timing file
    #[arg(long, default_value = "timingfile")]
    pub timingfile: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    pub overwrite: bool,

    /// Write asciicast v3 instead of v2
    #[arg(long)]
    pub v3: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

impl Script2Asciicast {
    /// Conversion options selected on the command line.
    #[must_use]
    pub fn convert_config(&self) -> ConvertConfig {
        let version = if self.v3 {
            CastVersion::V3
        } else {
            CastVersion::V2
        };
        ConvertConfig::new().cast_version(version)
    }
}

/// Run `script2asciicast`.
pub fn run_script2asciicast(args: &Script2Asciicast) -> Result<ConversionStats> {
    let typescript = open_input(&args.typescript)?;
    let timing = open_input(&args.timingfile)?;
    let mut output = create_sink(&args.output, args.overwrite)?;

    let stats = script_to_asciicast(typescript, timing, &mut output, &args.convert_config())
        .with_context(|| format!("converting {}", args.typescript.display()))?;
    output
        .flush()
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        written = stats.events_written,
        dropped = stats.events_dropped,
        output = %args.output.display(),
        "wrote asciicast recording"
    );
    Ok(stats)
}
