//! Address-multiplexed 16-bit bus access.
//!
//! The UI bus carries one 16-bit word on each of four channels selected by a
//! 2-bit address. This is the lowest layer of uilink:
//! - [`BusAccess`] is the seam to whatever drives the pins
//! - [`BusSampler`] walks the channels round robin, one word per tick
//! - [`LatchedBus`] and [`ScriptedBus`] stand in for hardware in tests and replays

pub mod channel;
pub mod error;
pub mod latched;
pub mod sampler;
pub mod scripted;
pub mod trace;
pub mod traits;

pub use channel::{Channel, ADDRESS_BITS, CHANNEL_COUNT};
pub use error::{BusError, Result};
pub use latched::{BusLatch, LatchedBus};
pub use sampler::{BusSampler, Sample, DEFAULT_SETTLE_DELAY};
pub use scripted::{BusState, ScriptedBus};
pub use trace::{load_trace, parse_trace, parse_word};
pub use traits::BusAccess;
