mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "uilink", version, about = "UI bus command decoder")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);

    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode_words() {
        let cli = Cli::try_parse_from(["uilink", "decode", "0x0041", "0x0005"])
            .expect("decode args should parse");

        match cli.command {
            Command::Decode(args) => assert_eq!(args.words, vec!["0x0041", "0x0005"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_more_than_four_words() {
        let result = Cli::try_parse_from(["uilink", "decode", "1", "2", "3", "4", "5"]);
        assert!(result.is_err(), "five words should fail");
    }

    #[test]
    fn parses_replay_with_timing_flags() {
        let cli = Cli::try_parse_from([
            "uilink",
            "--format",
            "json",
            "replay",
            "trace.txt",
            "--tick",
            "250us",
            "--stale-timeout",
            "20ms",
        ])
        .expect("replay args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        match cli.command {
            Command::Replay(args) => {
                assert_eq!(args.timing.tick, "250us");
                assert_eq!(args.timing.stale_timeout, "20ms");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_run_subcommand() {
        let cli = Cli::try_parse_from(["uilink", "run", "trace.txt", "--loop", "--count", "3"])
            .expect("run args should parse");

        match cli.command {
            Command::Run(args) => {
                assert!(args.looping);
                assert_eq!(args.count, Some(3));
                assert_eq!(args.fps, 60);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
