use uilink_bus::{Channel, CHANNEL_COUNT};

use crate::error::{FrameError, Result};
use crate::kind::CommandKind;
use crate::word::pairing_bit;

/// One pending word slot per bus channel.
///
/// An empty slot is `None`. Every 16-bit value is legitimate payload, so no
/// value is reserved to mean "nothing captured".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CommandBuffer {
    slots: [Option<u16>; CHANNEL_COUNT],
}

impl CommandBuffer {
    /// An all-empty buffer.
    pub const fn new() -> Self {
        Self {
            slots: [None; CHANNEL_COUNT],
        }
    }

    /// Buffer with `words` placed on channels 0, 1, ... in order.
    pub fn from_words(words: &[u16]) -> Result<Self> {
        if words.len() > CHANNEL_COUNT {
            return Err(FrameError::TooManyWords(words.len()));
        }
        let mut buffer = Self::new();
        for (slot, &word) in buffer.slots.iter_mut().zip(words) {
            *slot = Some(word);
        }
        Ok(buffer)
    }

    pub fn get(&self, channel: Channel) -> Option<u16> {
        self.slots[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, word: u16) {
        self.slots[channel.index()] = Some(word);
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots = [None; CHANNEL_COUNT];
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of captured words.
    pub fn present(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn slots(&self) -> &[Option<u16>; CHANNEL_COUNT] {
        &self.slots
    }
}

/// A complete command: the words its type requires, all sharing one pairing bit.
///
/// A `Frame` can only be built by the completeness check, so every frame is
/// decodable. Slots beyond the command's word count are not part of the
/// frame, which keeps duplicate detection independent of unrelated channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    kind: CommandKind,
    words: [u16; CHANNEL_COUNT],
}

impl Frame {
    /// Check `buffer` against the completeness rule for its command type.
    ///
    /// The type comes from the channel 0 word. Channels `0..word_count` must
    /// all be present and share the pairing bit of channel 0.
    pub fn from_buffer(buffer: &CommandBuffer) -> Result<Self> {
        let first = buffer.slots[0].ok_or(FrameError::MissingFirstWord)?;
        let kind = CommandKind::of_word(first)
            .ok_or(FrameError::UnknownCommandType(crate::word::type_field(first)))?;

        let required = kind.word_count();
        let mut words = [0u16; CHANNEL_COUNT];
        let mut present = 0usize;
        for (dst, slot) in words.iter_mut().zip(&buffer.slots[..required]) {
            if let Some(word) = slot {
                *dst = *word;
                present += 1;
            }
        }
        if present < required {
            return Err(FrameError::Incomplete {
                kind,
                required,
                present,
            });
        }

        let pairing = pairing_bit(first);
        if words[..required].iter().any(|&w| pairing_bit(w) != pairing) {
            return Err(FrameError::PairingMismatch { kind });
        }

        Ok(Self { kind, words })
    }

    /// Check `words` (channel 0 first) as if they had been captured from the bus.
    pub fn from_words(words: &[u16]) -> Result<Self> {
        Self::from_buffer(&CommandBuffer::from_words(words)?)
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The command's words, channel 0 first.
    pub fn words(&self) -> &[u16] {
        &self.words[..self.kind.word_count()]
    }

    /// Shared pairing bit of the frame's words.
    pub fn pairing(&self) -> bool {
        pairing_bit(self.words[0])
    }

    /// Word on channel `idx`. Zero for channels the command does not use.
    pub(crate) fn word(&self, idx: usize) -> u16 {
        self.words[idx]
    }
}
