//! Channel addressing.
//!
//! Two address lines select one of four word lanes. Channel 0 always carries
//! the first word of a command (the one holding the type field).

use std::fmt;

/// Number of address lines driving the multiplexer.
pub const ADDRESS_BITS: u32 = 2;

/// Number of addressable channels.
pub const CHANNEL_COUNT: usize = 1 << ADDRESS_BITS;

/// One of the four addressable word lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(u8);

impl Channel {
    /// All channels in polling order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel(0), Channel(1), Channel(2), Channel(3)];

    /// Returns the channel for `addr`, or `None` when it does not fit the address lines.
    pub const fn new(addr: u8) -> Option<Self> {
        if (addr as usize) < CHANNEL_COUNT {
            Some(Self(addr))
        } else {
            None
        }
    }

    /// Raw address value.
    pub const fn addr(self) -> u8 {
        self.0
    }

    /// Slot index for per-channel arrays.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The channel polled after this one.
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % CHANNEL_COUNT as u8)
    }

    /// Level of address line `bit` (0 = least significant) when this channel is selected.
    pub const fn address_line(self, bit: u32) -> bool {
        (self.0 >> bit) & 1 == 1
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

impl TryFrom<u8> for Channel {
    type Error = u8;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        Self::new(addr).ok_or(addr)
    }
}
