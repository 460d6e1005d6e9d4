use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use uilink_dispatch::{EngineReport, ReplayReport, Scene};
use uilink_frame::{AssemblerStats, DecodedCommand};

const COMMAND_SCHEMA: &str = "https://schemas.3leaps.dev/uilink/cli/v1/command-decoded.schema.json";
const REPLAY_SCHEMA: &str = "https://schemas.3leaps.dev/uilink/cli/v1/replay-report.schema.json";
const RUN_SCHEMA: &str = "https://schemas.3leaps.dev/uilink/cli/v1/run-report.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    schema_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_us: Option<u64>,
    #[serde(flatten)]
    command: &'a DecodedCommand,
}

#[derive(Serialize)]
struct ReplayOutput<'a> {
    schema_id: &'a str,
    trace: &'a str,
    commands: Vec<CommandOutput<'a>>,
    #[serde(flatten)]
    report: ReplaySummary,
}

#[derive(Serialize)]
struct ReplaySummary {
    ticks: u64,
    stats: AssemblerStats,
    dropped: u64,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    schema_id: &'a str,
    printed: usize,
    report: &'a EngineReport,
    text: Vec<String>,
}

/// A command together with where it appeared in a replay, if known.
pub struct CommandRecord<'a> {
    pub tick: Option<u64>,
    pub elapsed_us: Option<u64>,
    pub command: &'a DecodedCommand,
}

impl<'a> CommandRecord<'a> {
    pub fn untimed(command: &'a DecodedCommand) -> Self {
        Self {
            tick: None,
            elapsed_us: None,
            command,
        }
    }

    fn to_output(&self) -> CommandOutput<'a> {
        CommandOutput {
            schema_id: COMMAND_SCHEMA,
            tick: self.tick,
            elapsed_us: self.elapsed_us,
            command: self.command,
        }
    }
}

/// Print one command as it arrives.
pub fn print_command(record: &CommandRecord<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(&record.to_output())),
        OutputFormat::Table => println!("{}", command_table(std::slice::from_ref(record))),
        OutputFormat::Pretty => println!("{}", pretty_line(record)),
        OutputFormat::Raw => println!("{}", describe(record.command)),
    }
}

pub fn print_replay(trace: &str, report: &ReplayReport, format: OutputFormat) {
    let records: Vec<CommandRecord<'_>> = report
        .commands
        .iter()
        .map(|replayed| CommandRecord {
            tick: Some(replayed.tick),
            elapsed_us: Some(replayed.elapsed_us),
            command: &replayed.command,
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let out = ReplayOutput {
                schema_id: REPLAY_SCHEMA,
                trace,
                commands: records.iter().map(CommandRecord::to_output).collect(),
                report: ReplaySummary {
                    ticks: report.ticks,
                    stats: report.assembler,
                    dropped: report.dispatch.dropped,
                },
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            if !records.is_empty() {
                println!("{}", command_table(&records));
            }
            println!("{}", stats_table(report.ticks, &report.assembler));
        }
        OutputFormat::Pretty => {
            for record in &records {
                println!("{}", pretty_line(record));
            }
            println!(
                "ticks={} frames={} duplicates={} stale_discards={}",
                report.ticks,
                report.assembler.frames,
                report.assembler.duplicates,
                report.assembler.stale_discards
            );
        }
        OutputFormat::Raw => {
            for record in &records {
                println!("{}", describe(record.command));
            }
        }
    }
}

/// Final state after a live run.
pub fn print_run_summary(printed: usize, report: &EngineReport, scene: &Scene, format: OutputFormat) {
    let text: Vec<String> = scene
        .text_lines()
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect();

    match format {
        OutputFormat::Json => {
            let out = RunOutput {
                schema_id: RUN_SCHEMA,
                printed,
                report,
                text,
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            println!("{}", stats_table(report.iterations, &report.assembler));
            let mut sprites = Table::new();
            sprites
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SPRITE", "VARIANT", "X", "Y"]);
            for (id, placement) in scene.sprites() {
                sprites.add_row(vec![
                    id.to_string(),
                    placement.variant.to_string(),
                    placement.x.to_string(),
                    placement.y.to_string(),
                ]);
            }
            println!("{sprites}");
            for line in text {
                println!("{line}");
            }
        }
        OutputFormat::Pretty => {
            println!(
                "iterations={} frames={} enqueued={} dropped={} booted={}",
                report.iterations,
                report.assembler.frames,
                report.dispatch.enqueued,
                report.dispatch.dropped,
                scene.is_booted()
            );
            for line in text {
                println!("| {line}");
            }
        }
        OutputFormat::Raw => {}
    }
}

fn command_table(records: &[CommandRecord<'_>]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["TICK", "COMMAND", "FIELDS"]);
    for record in records {
        table.add_row(vec![
            record
                .tick
                .map(|tick| tick.to_string())
                .unwrap_or_else(|| "-".to_string()),
            record.command.kind().name().to_string(),
            fields(record.command),
        ]);
    }
    table
}

fn stats_table(ticks: u64, stats: &AssemblerStats) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["TICKS", "EDGES", "FRAMES", "DUPLICATES", "STALE"])
        .add_row(vec![
            ticks.to_string(),
            stats.edges.to_string(),
            stats.frames.to_string(),
            stats.duplicates.to_string(),
            stats.stale_discards.to_string(),
        ]);
    table
}

fn pretty_line(record: &CommandRecord<'_>) -> String {
    match record.tick {
        Some(tick) => format!("tick={tick} {}", describe(record.command)),
        None => describe(record.command),
    }
}

/// Command name followed by its fields.
pub fn describe(command: &DecodedCommand) -> String {
    let fields = fields(command);
    if fields.is_empty() {
        command.kind().name().to_string()
    } else {
        format!("{} {fields}", command.kind().name())
    }
}

fn fields(command: &DecodedCommand) -> String {
    match command {
        DecodedCommand::PrintChar(print) => {
            let shown = if print.is_printable() {
                format!("{:?}", print.character())
            } else {
                "<control>".to_string()
            };
            format!(
                "ascii={} char={shown} row={} col={}",
                print.ascii, print.row, print.col
            )
        }
        DecodedCommand::PlaySound(sound) => format!(
            "sound_id={} volume={} gain={:.2}",
            sound.sound_id,
            sound.volume,
            sound.gain()
        ),
        DecodedCommand::ClearScreen | DecodedCommand::Boot => String::new(),
        DecodedCommand::MoveSprite(pair) => format!(
            "sprite={}/{} at ({},{}) sprite={}/{} at ({},{})",
            pair.first.id,
            pair.first.variant,
            pair.first.x,
            pair.first.y,
            pair.second.id,
            pair.second.variant,
            pair.second.x,
            pair.second.y
        ),
        DecodedCommand::Debug(data) => format!(
            "d1={} d2={} d3={} d4={}",
            data.d1, data.d2, data.d3, data.d4
        ),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
