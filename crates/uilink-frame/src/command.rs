use serde::Serialize;

use crate::buffer::Frame;
use crate::error::Result;
use crate::kind::CommandKind;
use crate::word::bits;

/// Print one character on the text grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PrintChar {
    pub ascii: u8,
    /// Text row, 7 bits.
    pub row: u8,
    /// Text column, 8 bits.
    pub col: u8,
}

impl PrintChar {
    /// Control characters and DEL are not drawable; consumers may skip them.
    pub fn is_printable(&self) -> bool {
        (32..127).contains(&self.ascii)
    }

    pub fn character(&self) -> char {
        char::from(self.ascii)
    }
}

/// Start a sound sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlaySound {
    pub sound_id: u8,
    /// Raw 3-bit volume level. Level 0 means full volume, not mute.
    pub volume: u8,
}

impl PlaySound {
    /// Linear gain for the volume level: 0 maps to 1.0, otherwise `volume / 7`.
    pub fn gain(&self) -> f32 {
        if self.volume == 0 {
            1.0
        } else {
            f32::from(self.volume) / 7.0
        }
    }
}

/// Target placement for one sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpriteMove {
    /// Sprite id, 4 bits.
    pub id: u8,
    /// Image variant, 4 bits.
    pub variant: u8,
    /// Horizontal position on the logical surface, 8 bits.
    pub x: u8,
    /// Vertical position on the logical surface, 7 bits.
    pub y: u8,
}

/// MoveSprite always moves two sprites at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpritePair {
    pub first: SpriteMove,
    pub second: SpriteMove,
}

/// Informational words from the host; no presentation effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DebugData {
    /// Bits 10..0 of the first word.
    pub d1: u16,
    pub d2: u16,
    pub d3: u16,
    pub d4: u16,
}

/// A fully decoded bus command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DecodedCommand {
    PrintChar(PrintChar),
    PlaySound(PlaySound),
    ClearScreen,
    Boot,
    MoveSprite(SpritePair),
    Debug(DebugData),
}

impl DecodedCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::PrintChar(_) => CommandKind::PrintChar,
            Self::PlaySound(_) => CommandKind::PlaySound,
            Self::ClearScreen => CommandKind::ClearScreen,
            Self::Boot => CommandKind::Boot,
            Self::MoveSprite(_) => CommandKind::MoveSprite,
            Self::Debug(_) => CommandKind::Debug,
        }
    }
}

/// Extract the typed fields of a complete frame.
///
/// Every field is masked to its width, so decoding cannot fail.
pub fn decode(frame: &Frame) -> DecodedCommand {
    let w0 = frame.word(0);
    match frame.kind() {
        CommandKind::PrintChar => {
            let w1 = frame.word(1);
            DecodedCommand::PrintChar(PrintChar {
                ascii: bits(w0, 7, 0) as u8,
                row: bits(w1, 14, 8) as u8,
                col: bits(w1, 7, 0) as u8,
            })
        }
        CommandKind::PlaySound => DecodedCommand::PlaySound(PlaySound {
            sound_id: bits(w0, 7, 0) as u8,
            volume: bits(w0, 10, 8) as u8,
        }),
        CommandKind::ClearScreen => DecodedCommand::ClearScreen,
        CommandKind::Boot => DecodedCommand::Boot,
        CommandKind::MoveSprite => DecodedCommand::MoveSprite(SpritePair {
            first: sprite_move(w0, frame.word(1)),
            second: sprite_move(frame.word(2), frame.word(3)),
        }),
        CommandKind::Debug => DecodedCommand::Debug(DebugData {
            d1: bits(w0, 10, 0),
            d2: frame.word(1),
            d3: frame.word(2),
            d4: frame.word(3),
        }),
    }
}

/// Check and decode words supplied directly (channel 0 first).
pub fn decode_words(words: &[u16]) -> Result<DecodedCommand> {
    Frame::from_words(words).map(|frame| decode(&frame))
}

// Sprite selector: id in bits 10..7, variant in 6..3. Position: y in 14..8, x in 7..0.
fn sprite_move(selector: u16, position: u16) -> SpriteMove {
    SpriteMove {
        id: bits(selector, 10, 7) as u8,
        variant: bits(selector, 6, 3) as u8,
        x: bits(position, 7, 0) as u8,
        y: bits(position, 14, 8) as u8,
    }
}
