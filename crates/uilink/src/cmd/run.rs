use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use uilink_bus::{load_trace, ScriptedBus};
use uilink_dispatch::{Engine, EngineConfig, Scene};
use uilink_frame::AssemblerConfig;

use crate::cmd::{parse_duration, RunArgs};
use crate::exit::{bus_error, dispatch_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_command, print_run_summary, CommandRecord, OutputFormat};

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    if args.fps == 0 {
        return Err(CliError::new(USAGE, "--fps must be greater than zero"));
    }
    let tick = parse_duration("--tick", &args.timing.tick)?;
    let stale_timeout = parse_duration("--stale-timeout", &args.timing.stale_timeout)?;

    let states = load_trace(&args.trace, tick).map_err(|err| bus_error("load failed", err))?;
    let bus = ScriptedBus::new(states)
        .map_err(|err| bus_error("load failed", err))?
        .with_looping(args.looping);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let config = EngineConfig {
        poll_interval: tick,
        queue_capacity: args.queue_capacity,
        assembler: AssemblerConfig { stale_timeout },
        ..EngineConfig::default()
    };
    let (engine, mut queue) =
        Engine::start(bus, config).map_err(|err| dispatch_error("engine start failed", err))?;

    let frame_period = Duration::from_secs(1) / args.fps;
    let mut scene = Scene::new();
    let mut printed = 0usize;

    'frames: while running.load(Ordering::SeqCst) {
        // Checked before draining so nothing queued by a finished loop is missed.
        let finished = !engine.is_running();

        for command in queue.drain() {
            scene.apply(&command);
            print_command(&CommandRecord::untimed(&command), format);
            printed = printed.saturating_add(1);

            if args.count.is_some_and(|count| printed >= count) {
                break 'frames;
            }
        }

        if finished {
            break;
        }
        thread::sleep(frame_period);
    }

    let report = engine
        .stop()
        .map_err(|err| dispatch_error("engine stop failed", err))?;
    print_run_summary(printed, &report, &scene, format);

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
