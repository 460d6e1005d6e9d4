use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};
use uilink_bus::{Channel, CHANNEL_COUNT};

use crate::buffer::{CommandBuffer, Frame};

/// Default idle time after which a partial command is discarded.
pub const DEFAULT_STALE_TIMEOUT: Duration = Duration::from_millis(50);

/// Configuration for the frame assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Idle time without any channel edge after which a partial command is dropped.
    pub stale_timeout: Duration,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            stale_timeout: DEFAULT_STALE_TIMEOUT,
        }
    }
}

/// Running counters kept by the assembler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssemblerStats {
    /// Channel value changes observed.
    pub edges: u64,
    /// Complete, new frames emitted.
    pub frames: u64,
    /// Complete frames suppressed because they repeat the last emitted one.
    pub duplicates: u64,
    /// Partial commands discarded by the stale timeout.
    pub stale_discards: u64,
}

/// Reassembles commands from per-channel samples.
///
/// Each channel keeps at most one pending word. A new word is only captured
/// on an edge (value differs from the last sample of that channel). After
/// every observation the pending set is checked for completeness; a complete
/// frame is emitted unless it equals the last emitted frame, and the pending
/// set is cleared either way. Last-sample values survive that clear, so an
/// unchanged lane is not re-captured.
///
/// When no edge has been seen for longer than the stale timeout while words
/// are pending, both the pending set and the last-sample memory are wiped.
/// Wiping the last samples means the next read of every lane counts as an
/// edge again, even if its value never changed.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    config: AssemblerConfig,
    pending: CommandBuffer,
    last_sample: [Option<u16>; CHANNEL_COUNT],
    last_dispatched: Option<Frame>,
    last_change: Option<Instant>,
    stats: AssemblerStats,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create an assembler with default configuration.
    pub fn new() -> Self {
        Self::with_config(AssemblerConfig::default())
    }

    /// Create an assembler with explicit configuration.
    pub fn with_config(config: AssemblerConfig) -> Self {
        Self {
            config,
            pending: CommandBuffer::new(),
            last_sample: [None; CHANNEL_COUNT],
            last_dispatched: None,
            last_change: None,
            stats: AssemblerStats::default(),
        }
    }

    /// Observe a sample taken now.
    pub fn observe(&mut self, channel: Channel, value: u16) -> Option<Frame> {
        self.observe_at(channel, value, Instant::now())
    }

    /// Observe a sample taken at `now`.
    ///
    /// Returns the frame to dispatch, if this sample completed a new command.
    pub fn observe_at(&mut self, channel: Channel, value: u16, now: Instant) -> Option<Frame> {
        let idx = channel.index();
        if self.last_sample[idx] != Some(value) {
            trace!(%channel, value, "edge");
            self.pending.set(channel, value);
            self.last_sample[idx] = Some(value);
            self.last_change = Some(now);
            self.stats.edges += 1;
        }

        let emitted = self.take_complete();

        if !self.pending.is_empty() && self.is_stale(now) {
            debug!(
                pending = ?self.pending.slots(),
                timeout = ?self.config.stale_timeout,
                "discarding stale partial command"
            );
            self.pending.clear();
            self.last_sample = [None; CHANNEL_COUNT];
            self.stats.stale_discards += 1;
        }

        emitted
    }

    fn take_complete(&mut self) -> Option<Frame> {
        let frame = Frame::from_buffer(&self.pending).ok()?;
        self.pending.clear();

        if self.last_dispatched == Some(frame) {
            debug!(kind = %frame.kind(), words = ?frame.words(), "suppressing repeated frame");
            self.stats.duplicates += 1;
            return None;
        }

        debug!(kind = %frame.kind(), words = ?frame.words(), "frame complete");
        self.last_dispatched = Some(frame);
        self.stats.frames += 1;
        Some(frame)
    }

    fn is_stale(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|changed| now.saturating_duration_since(changed) > self.config.stale_timeout)
    }

    /// Words captured for the command in progress.
    pub fn pending(&self) -> &CommandBuffer {
        &self.pending
    }

    /// The most recently emitted frame.
    pub fn last_dispatched(&self) -> Option<&Frame> {
        self.last_dispatched.as_ref()
    }

    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Forget all pending words, sample history and the last emitted frame.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.last_sample = [None; CHANNEL_COUNT];
        self.last_dispatched = None;
        self.last_change = None;
    }
}
