use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("uilink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: uilink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("UILINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "defaults: settle_delay={:?} poll_interval={:?} queue_capacity={} stale_timeout={:?}",
        uilink_bus::DEFAULT_SETTLE_DELAY,
        uilink_dispatch::DEFAULT_POLL_INTERVAL,
        uilink_dispatch::DEFAULT_QUEUE_CAPACITY,
        uilink_frame::DEFAULT_STALE_TIMEOUT
    );

    Ok(SUCCESS)
}
