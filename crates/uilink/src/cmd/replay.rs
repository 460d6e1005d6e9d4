use uilink_bus::{load_trace, ScriptedBus};
use uilink_dispatch::replay;
use uilink_frame::AssemblerConfig;

use crate::cmd::{parse_duration, ReplayArgs};
use crate::exit::{bus_error, dispatch_error, CliResult, SUCCESS};
use crate::output::{print_replay, OutputFormat};

pub fn run(args: ReplayArgs, format: OutputFormat) -> CliResult<i32> {
    let tick = parse_duration("--tick", &args.timing.tick)?;
    let stale_timeout = parse_duration("--stale-timeout", &args.timing.stale_timeout)?;

    let states = load_trace(&args.trace, tick).map_err(|err| bus_error("load failed", err))?;
    let bus = ScriptedBus::new(states).map_err(|err| bus_error("load failed", err))?;

    let report = replay(bus, tick, AssemblerConfig { stale_timeout })
        .map_err(|err| dispatch_error("replay failed", err))?;

    tracing::info!(
        ticks = report.ticks,
        commands = report.commands.len(),
        duplicates = report.assembler.duplicates,
        stale_discards = report.assembler.stale_discards,
        "replay complete"
    );

    print_replay(&args.trace.display().to_string(), &report, format);
    Ok(SUCCESS)
}
