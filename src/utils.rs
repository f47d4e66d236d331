//! Common tools

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

impl BitState {
    /// `true` for [`BitState::Set`]
    pub fn is_set(self) -> bool {
        self == BitState::Set
    }
}

/// Simple bit ops
pub trait BitOps {
    /// Read a single bit, `pos` 0 is the least significant one
    fn check_bit(&self, pos: u8) -> BitState;

    /// All 8 bits, most significant bit first
    fn bits_msb_first(&self) -> [BitState; 8] {
        core::array::from_fn(|index| self.check_bit(7 - index as u8))
    }
}

impl BitOps for u8 {
    fn check_bit(&self, pos: u8) -> BitState {
        assert!(pos <= 7, "bit offset larger than 7");

        match (*self >> pos) & 1 == 1 {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_bit_reads_each_position() {
        let byte: u8 = 0b1000_0001;
        assert_eq!(byte.check_bit(0), BitState::Set);
        assert_eq!(byte.check_bit(1), BitState::Clear);
        assert_eq!(byte.check_bit(7), BitState::Set);
    }

    #[test]
    fn msb_comes_first() {
        let bits = 0x38u8.bits_msb_first();
        let as_bools: [bool; 8] = core::array::from_fn(|i| bits[i].is_set());
        assert_eq!(
            as_bools,
            [false, false, true, true, true, false, false, false]
        );
    }

    #[test]
    #[should_panic(expected = "bit offset larger than 7")]
    fn out_of_range_offset_panics() {
        0u8.check_bit(8);
    }
}
