use std::fmt;

use serde::Serialize;

use crate::word::type_field;

/// The command types defined on the bus. Type values 6..=15 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    PrintChar = 0,
    PlaySound = 1,
    ClearScreen = 2,
    Boot = 3,
    MoveSprite = 4,
    Debug = 5,
}

impl CommandKind {
    /// Every defined kind, ordered by type value.
    pub const ALL: [CommandKind; 6] = [
        CommandKind::PrintChar,
        CommandKind::PlaySound,
        CommandKind::ClearScreen,
        CommandKind::Boot,
        CommandKind::MoveSprite,
        CommandKind::Debug,
    ];

    /// Kind for a raw type field, `None` for reserved values.
    pub const fn from_type_field(field: u8) -> Option<Self> {
        match field {
            0 => Some(Self::PrintChar),
            1 => Some(Self::PlaySound),
            2 => Some(Self::ClearScreen),
            3 => Some(Self::Boot),
            4 => Some(Self::MoveSprite),
            5 => Some(Self::Debug),
            _ => None,
        }
    }

    /// Kind announced by a first word.
    pub const fn of_word(word: u16) -> Option<Self> {
        Self::from_type_field(type_field(word))
    }

    /// Raw type field value.
    pub const fn type_field(self) -> u8 {
        self as u8
    }

    /// Number of words (channels 0..n) a complete command occupies.
    pub const fn word_count(self) -> usize {
        match self {
            Self::PrintChar => 2,
            Self::PlaySound | Self::ClearScreen | Self::Boot => 1,
            Self::MoveSprite | Self::Debug => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PrintChar => "print_char",
            Self::PlaySound => "play_sound",
            Self::ClearScreen => "clear_screen",
            Self::Boot => "boot",
            Self::MoveSprite => "move_sprite",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
