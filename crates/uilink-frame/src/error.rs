use crate::kind::CommandKind;

/// Reasons a set of words does not form a complete command.
///
/// The assembler treats all of these as "not complete yet"; they only
/// surface when words are handed in directly, e.g. from the command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Channel 0 holds no word, so the command type is unknown.
    #[error("missing first word (channel 0)")]
    MissingFirstWord,

    /// The type field does not name a known command.
    #[error("unknown command type {0:#06b}")]
    UnknownCommandType(u8),

    /// Some of the words the command type requires are missing.
    #[error("{kind} needs {required} words, {present} present")]
    Incomplete {
        kind: CommandKind,
        required: usize,
        present: usize,
    },

    /// The required words do not share the same pairing bit.
    #[error("{kind} words have mismatched pairing bits")]
    PairingMismatch { kind: CommandKind },

    /// More words than bus channels.
    #[error("too many words ({0}, max 4)")]
    TooManyWords(usize),
}

pub type Result<T> = std::result::Result<T, FrameError>;
