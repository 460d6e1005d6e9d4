use crate::channel::Channel;

/// Direct access to the multiplexed bus pins.
///
/// Both calls are synchronous and side-effecting against the electrical
/// state of the bus. They cannot fail: a stuck or noisy line simply reads
/// back whatever levels are present.
pub trait BusAccess {
    /// Drive the address lines so `channel` is presented on the data lines.
    fn select_channel(&mut self, channel: Channel);

    /// Read the 16 data lines (bit 0 = least significant line).
    fn read_word(&mut self) -> u16;

    /// True once a replay source has nothing more to present.
    ///
    /// Hardware never finishes; the polling loop runs until stopped.
    fn is_finished(&self) -> bool {
        false
    }
}

impl<B: BusAccess + ?Sized> BusAccess for &mut B {
    fn select_channel(&mut self, channel: Channel) {
        (**self).select_channel(channel)
    }

    fn read_word(&mut self) -> u16 {
        (**self).read_word()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

impl<B: BusAccess + ?Sized> BusAccess for Box<B> {
    fn select_channel(&mut self, channel: Channel) {
        (**self).select_channel(channel)
    }

    fn read_word(&mut self) -> u16 {
        (**self).read_word()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}
