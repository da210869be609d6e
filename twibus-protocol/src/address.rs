//! Address byte encoding
//!
//! The first byte after a START carries the 7-bit target address in bits
//! 7..1 and the transfer direction in bit 0.

use crate::status::BusStatusCode;

/// Highest valid 7-bit address
pub const MAX_ADDRESS: u8 = 0x7F;

/// General call (broadcast) address
pub const GENERAL_CALL_ADDRESS: u8 = 0x00;

/// Transfer direction, the R/W bit of the address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    /// Master transmits (R/W = 0)
    Write = 0,
    /// Master receives (R/W = 1)
    Read = 1,
}

impl Direction {
    /// R/W bit value
    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Status expected once the address byte for this direction is acknowledged
    pub fn address_ack(self) -> BusStatusCode {
        match self {
            Direction::Write => BusStatusCode::AddressWriteAck,
            Direction::Read => BusStatusCode::AddressReadAck,
        }
    }
}

/// Check that an address fits in 7 bits
pub fn is_valid_address(address: u8) -> bool {
    address <= MAX_ADDRESS
}

/// Build the address byte sent after START
///
/// Returns `None` if `address` does not fit in 7 bits.
pub fn address_byte(address: u8, direction: Direction) -> Option<u8> {
    if !is_valid_address(address) {
        return None;
    }
    Some((address << 1) | direction.bit())
}
