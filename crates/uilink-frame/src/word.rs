//! Bit layout of a bus word.
//!
//! ```text
//!  15   14 .. 11   10 .. 0
//! ┌───┬──────────┬──────────────────┐
//! │ P │   type   │ per-type payload │   first word (channel 0)
//! └───┴──────────┴──────────────────┘
//! ┌───┬─────────────────────────────┐
//! │ P │      per-type payload       │   following words
//! └───┴─────────────────────────────┘
//! ```

/// Bit index of the pairing marker.
pub const PAIRING_BIT: u32 = 15;

/// Lowest bit of the type field.
pub const TYPE_SHIFT: u32 = 11;

/// Width mask of the type field.
pub const TYPE_MASK: u16 = 0b1111;

/// Pairing bit of `word`.
pub const fn pairing_bit(word: u16) -> bool {
    (word >> PAIRING_BIT) & 1 == 1
}

/// Command type field (bits 14..11) of `word`.
pub const fn type_field(word: u16) -> u8 {
    ((word >> TYPE_SHIFT) & TYPE_MASK) as u8
}

/// Bits `hi..=lo` of `word`, shifted down to bit 0.
pub const fn bits(word: u16, hi: u32, lo: u32) -> u16 {
    let width = hi - lo + 1;
    (((word as u32) >> lo) & ((1u32 << width) - 1)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_header_fields() {
        let word = 0b1_0100_00000000000;
        assert!(pairing_bit(word));
        assert_eq!(type_field(word), 4);
        assert!(!pairing_bit(0x7FFF));
        assert_eq!(type_field(0x7FFF), 0b1111);
    }

    #[test]
    fn bits_handles_full_width() {
        assert_eq!(bits(0xABCD, 15, 0), 0xABCD);
        assert_eq!(bits(0xABCD, 7, 0), 0xCD);
        assert_eq!(bits(0x3264, 14, 8), 50);
        assert_eq!(bits(0x0700, 10, 8), 7);
    }
}
