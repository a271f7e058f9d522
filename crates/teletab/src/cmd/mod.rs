use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod ports;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch a serial port and refresh the indicator table live.
    Watch(WatchArgs),
    /// Decode a captured byte stream offline.
    Decode(DecodeArgs),
    /// List serial ports visible to this process.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Serial port to read from (e.g. /dev/ttyUSB0, COM7).
    pub port: String,

    /// Baud rate.
    #[arg(long, default_value_t = 647_000)]
    pub baud: u32,

    /// Bounded serial read timeout (e.g. 200ms, 1s).
    #[arg(long, default_value = "200ms")]
    pub read_timeout: String,

    /// Sleep between poll cycles (e.g. 100ms).
    #[arg(long, default_value = "100ms")]
    pub poll_interval: String,

    /// Send the one-shot 's' start-request byte after opening.
    #[arg(long)]
    pub request_start: bool,

    /// Staleness scale, ascending DURATION=LABEL bands with a final
    /// overflow label (default: 5s=fresh,60s=updated,120s=stale,archived).
    #[arg(long, value_name = "SPEC")]
    pub staleness: Option<String>,

    /// Symbols exempt from the divide-by-16 value scaling.
    #[arg(long, value_delimiter = ',', default_values_t = ['c', 'P'])]
    pub unscaled: Vec<char>,

    /// Symbol whose frames carry the real symbol in the first extra byte.
    #[arg(long, default_value_t = 'H')]
    pub substitution_trigger: char,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File of captured raw bytes. Reads stdin when neither this nor
    /// --hex is given.
    pub file: Option<PathBuf>,

    /// Inline hex byte string (e.g. "FC 53 01 00 10 00 00").
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,

    /// Symbols exempt from the divide-by-16 value scaling.
    #[arg(long, value_delimiter = ',', default_values_t = ['c', 'P'])]
    pub unscaled: Vec<char>,

    /// Symbol whose frames carry the real symbol in the first extra byte.
    #[arg(long, default_value_t = 'H')]
    pub substitution_trigger: char,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
