use std::time::Duration;

use uilink_bus::DEFAULT_SETTLE_DELAY;
use uilink_frame::AssemblerConfig;

/// Default pause between polling iterations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Default number of decoded commands buffered for the consumer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Controls the polling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Wait between selecting a channel and reading it.
    pub settle_delay: Duration,
    /// Pause at the end of each polling iteration. Zero spins.
    pub poll_interval: Duration,
    /// Capacity of the command queue. Must be non-zero.
    pub queue_capacity: usize,
    /// Frame assembly settings.
    pub assembler: AssemblerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            assembler: AssemblerConfig::default(),
        }
    }
}
