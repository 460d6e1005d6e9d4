use crate::channel::{Channel, CHANNEL_COUNT};
use crate::error::{BusError, Result};
use crate::traits::BusAccess;

/// Lane values held on the bus for a number of sampling ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusState {
    /// Word presented on each channel, channel 0 first.
    pub words: [u16; CHANNEL_COUNT],
    /// Number of reads this state stays on the bus. Always at least 1.
    pub hold_ticks: u32,
}

impl BusState {
    /// Create a state held for `hold_ticks` reads (clamped to at least one).
    pub fn new(words: [u16; CHANNEL_COUNT], hold_ticks: u32) -> Self {
        Self {
            words,
            hold_ticks: hold_ticks.max(1),
        }
    }
}

/// Replays a fixed sequence of bus states, one tick per [`read_word`](BusAccess::read_word).
///
/// Once the last state has been held for its full duration the bus keeps
/// presenting it and reports [`is_exhausted`](Self::is_exhausted), unless
/// looping is enabled.
#[derive(Debug, Clone)]
pub struct ScriptedBus {
    states: Vec<BusState>,
    index: usize,
    remaining: u32,
    selected: usize,
    ticks: u64,
    looping: bool,
    exhausted: bool,
}

impl ScriptedBus {
    /// Create a bus from a non-empty state sequence.
    pub fn new(states: Vec<BusState>) -> Result<Self> {
        let first = states.first().ok_or(BusError::EmptyTrace)?;
        let remaining = first.hold_ticks.max(1);
        Ok(Self {
            states,
            index: 0,
            remaining,
            selected: 0,
            ticks: 0,
            looping: false,
            exhausted: false,
        })
    }

    /// Restart from the first state after the last one instead of holding it.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// True once a non-looping script has played every state to the end.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of reads served so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total ticks in one pass over the script.
    pub fn script_ticks(&self) -> u64 {
        self.states.iter().map(|s| u64::from(s.hold_ticks)).sum()
    }

    /// State currently on the bus.
    pub fn current(&self) -> &BusState {
        &self.states[self.index]
    }

    fn advance(&mut self) {
        if self.remaining > 1 {
            self.remaining -= 1;
            return;
        }

        if self.index + 1 < self.states.len() {
            self.index += 1;
        } else if self.looping {
            self.index = 0;
        } else {
            self.exhausted = true;
            return;
        }
        self.remaining = self.states[self.index].hold_ticks.max(1);
    }
}

impl BusAccess for ScriptedBus {
    fn select_channel(&mut self, channel: Channel) {
        self.selected = channel.index();
    }

    fn read_word(&mut self) -> u16 {
        let value = self.states[self.index].words[self.selected];
        self.ticks += 1;
        self.advance();
        value
    }

    fn is_finished(&self) -> bool {
        self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(bus: &mut ScriptedBus, addr: u8) -> u16 {
        bus.select_channel(Channel::new(addr).unwrap());
        bus.read_word()
    }

    #[test]
    fn empty_script_is_rejected() {
        assert!(matches!(ScriptedBus::new(Vec::new()), Err(BusError::EmptyTrace)));
    }

    #[test]
    fn holds_each_state_for_its_ticks() {
        let mut bus = ScriptedBus::new(vec![
            BusState::new([0x10, 0x11, 0x12, 0x13], 2),
            BusState::new([0x20, 0x21, 0x22, 0x23], 1),
        ])
        .unwrap();

        assert_eq!(read(&mut bus, 0), 0x10);
        assert_eq!(read(&mut bus, 1), 0x11);
        assert!(!bus.is_exhausted());
        assert_eq!(read(&mut bus, 2), 0x22);
        assert!(bus.is_exhausted());
        assert!(bus.is_finished());
        assert_eq!(read(&mut bus, 3), 0x23);
        assert_eq!(bus.ticks(), 4);
        assert_eq!(bus.script_ticks(), 3);
    }

    #[test]
    fn looping_script_restarts() {
        let mut bus = ScriptedBus::new(vec![
            BusState::new([1, 0, 0, 0], 1),
            BusState::new([2, 0, 0, 0], 1),
        ])
        .unwrap()
        .with_looping(true);

        let seen: Vec<u16> = (0..5).map(|_| read(&mut bus, 0)).collect();
        assert_eq!(seen, vec![1, 2, 1, 2, 1]);
        assert!(!bus.is_exhausted());
    }

    #[test]
    fn zero_hold_is_clamped() {
        assert_eq!(BusState::new([0; 4], 0).hold_ticks, 1);
    }
}
