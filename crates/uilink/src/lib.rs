//! Command decoding for a multiplexed 16-bit UI bus.
//!
//! A host drives four 16-bit words through a 2-bit address multiplexer.
//! uilink samples the lanes, reassembles multi-word commands using the
//! pairing bit, decodes them and hands them to a presentation backend.
//!
//! # Crate Structure
//!
//! - [`bus`]: channel addressing, the bus access seam, sampler, test buses and trace files
//! - [`frame`]: word layout, frame assembly and command decoding
//! - [`dispatch`]: bounded command queue, polling engine and headless scene

/// Re-export bus types.
pub mod bus {
    pub use uilink_bus::*;
}

/// Re-export frame types.
pub mod frame {
    pub use uilink_frame::*;
}

/// Re-export dispatch types.
pub mod dispatch {
    pub use uilink_dispatch::*;
}
