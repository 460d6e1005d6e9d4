use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod replay;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode words given on the command line (channel 0 first).
    Decode(DecodeArgs),
    /// Replay a bus trace on a virtual clock and print every dispatched command.
    Replay(ReplayArgs),
    /// Play a bus trace through the live polling engine.
    Run(RunArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Replay(args) => replay::run(args, format),
        Command::Run(args) => run::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Bus words as hex (0x0041), binary (0b...) or decimal.
    #[arg(required = true, num_args = 1..=4)]
    pub words: Vec<String>,
}

#[derive(Args, Debug)]
pub struct TimingArgs {
    /// Sampling period; converts duration holds in the trace to ticks (e.g. 100us).
    #[arg(long, env = "UILINK_TICK", default_value = "100us")]
    pub tick: String,
    /// Idle time after which a partial command is discarded (e.g. 50ms).
    #[arg(long, env = "UILINK_STALE_TIMEOUT", default_value = "50ms")]
    pub stale_timeout: String,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Trace file, one bus state per line.
    pub trace: PathBuf,
    #[command(flatten)]
    pub timing: TimingArgs,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Trace file, one bus state per line.
    pub trace: PathBuf,
    #[command(flatten)]
    pub timing: TimingArgs,
    /// Restart the trace after its last state.
    #[arg(long = "loop")]
    pub looping: bool,
    /// Consumer frame rate.
    #[arg(long, default_value = "60")]
    pub fps: u32,
    /// Exit after printing N commands.
    #[arg(long)]
    pub count: Option<usize>,
    /// Command queue capacity.
    #[arg(long, default_value = "256")]
    pub queue_capacity: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a positive duration such as `5s`, `150ms` or `250us`. Bare numbers are seconds.
pub fn parse_duration(flag: &str, input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, format!("{flag} must not be empty")));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("us") {
        (num, Duration::from_micros(1))
    } else if let Some(num) = input.strip_suffix("ms") {
        (num, Duration::from_millis(1))
    } else if let Some(num) = input.strip_suffix('s') {
        (num, Duration::from_secs(1))
    } else {
        (input, Duration::from_secs(1))
    };

    let value: u32 = number
        .trim()
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid {flag} value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, format!("{flag} must be greater than zero")));
    }

    Ok(unit * value)
}
