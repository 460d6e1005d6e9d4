use std::time::Duration;

use crate::channel::Channel;
use crate::traits::BusAccess;

/// Default delay between driving the address lines and reading the data lines.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_micros(1);

/// One word read from one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// The channel that was addressed.
    pub channel: Channel,
    /// Raw 16-bit value on the data lines.
    pub value: u16,
}

/// Reads the bus one channel per tick, cycling 0 → 1 → 2 → 3 → 0.
///
/// Correctness of the bit content is not the sampler's concern; it reports
/// whatever the bus presents.
pub struct BusSampler<B> {
    bus: B,
    next: Channel,
    settle_delay: Duration,
}

impl<B: BusAccess> BusSampler<B> {
    /// Create a sampler starting at channel 0 with the default settle delay.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            next: Channel::ALL[0],
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Override the settle delay. `Duration::ZERO` skips the wait entirely.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Select the next channel, let the lines settle, and read one word.
    pub fn sample_next(&mut self) -> Sample {
        let channel = self.next;
        self.next = channel.next();

        self.bus.select_channel(channel);
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        let value = self.bus.read_word();

        Sample { channel, value }
    }

    /// Channel that the next call to [`sample_next`](Self::sample_next) will address.
    pub fn next_channel(&self) -> Channel {
        self.next
    }

    /// Configured settle delay.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Borrow the underlying bus.
    pub fn get_ref(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the underlying bus.
    pub fn get_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consume the sampler and return the bus.
    pub fn into_inner(self) -> B {
        self.bus
    }
}
