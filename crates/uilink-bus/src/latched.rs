use std::sync::atomic::{AtomicU16, AtomicU8, Ordering};
use std::sync::Arc;

use crate::channel::{Channel, CHANNEL_COUNT};
use crate::traits::BusAccess;

#[derive(Debug, Default)]
struct Lanes {
    words: [AtomicU16; CHANNEL_COUNT],
    selected: AtomicU8,
}

/// Bus whose four lanes are held in shared atomics.
///
/// The sampling loop owns the [`LatchedBus`]; any other thread may drive the
/// lanes through a cloned [`BusLatch`], the way the host computer drives the
/// real data lines.
#[derive(Debug, Default)]
pub struct LatchedBus {
    lanes: Arc<Lanes>,
    selected: usize,
}

/// Writer side of a [`LatchedBus`].
#[derive(Debug, Clone)]
pub struct BusLatch {
    lanes: Arc<Lanes>,
}

impl LatchedBus {
    /// Create a bus with all lanes low, plus a latch to drive it.
    pub fn new() -> (Self, BusLatch) {
        let bus = Self::default();
        let latch = bus.latch();
        (bus, latch)
    }

    /// Create another writer for this bus.
    pub fn latch(&self) -> BusLatch {
        BusLatch {
            lanes: Arc::clone(&self.lanes),
        }
    }
}

impl BusAccess for LatchedBus {
    fn select_channel(&mut self, channel: Channel) {
        self.selected = channel.index();
        self.lanes.selected.store(channel.addr(), Ordering::Relaxed);
    }

    fn read_word(&mut self) -> u16 {
        self.lanes.words[self.selected].load(Ordering::Acquire)
    }
}

impl BusLatch {
    /// Present `value` on `channel`.
    pub fn set(&self, channel: Channel, value: u16) {
        self.lanes.words[channel.index()].store(value, Ordering::Release);
    }

    /// Present a whole command word-set at once, channel 0 first.
    pub fn set_all(&self, words: [u16; CHANNEL_COUNT]) {
        for (channel, word) in Channel::ALL.into_iter().zip(words) {
            self.set(channel, word);
        }
    }

    /// Current value on `channel`.
    pub fn get(&self, channel: Channel) -> u16 {
        self.lanes.words[channel.index()].load(Ordering::Acquire)
    }

    /// Channel most recently selected by the reader.
    pub fn selected(&self) -> Channel {
        Channel::new(self.lanes.selected.load(Ordering::Relaxed)).unwrap_or(Channel::ALL[0])
    }
}
