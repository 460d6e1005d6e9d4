//! Frame assembly and command decoding for the uilink bus.
//!
//! Commands arrive as one to four 16-bit words spread over the four bus
//! channels. There is no length prefix and no delimiter:
//! - bit 15 of every word is the pairing bit; words of one command share it
//! - bits 14..11 of the channel 0 word carry the command type
//! - the type implies how many words the command needs
//!
//! [`FrameAssembler`] turns the sampled word stream into complete [`Frame`]s,
//! and [`decode`] turns a frame into a typed [`DecodedCommand`].

pub mod assembler;
pub mod buffer;
pub mod command;
pub mod error;
pub mod kind;
pub mod word;

pub use assembler::{AssemblerConfig, AssemblerStats, FrameAssembler, DEFAULT_STALE_TIMEOUT};
pub use buffer::{CommandBuffer, Frame};
pub use command::{
    decode, decode_words, DebugData, DecodedCommand, PlaySound, PrintChar, SpriteMove,
    SpritePair,
};
pub use error::{FrameError, Result};
pub use kind::CommandKind;
pub use uilink_bus::Channel;
