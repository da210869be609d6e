//! TWI register abstractions
//!
//! Provides the register-level capability surface of a TWI peripheral
//! that chip-specific HALs implement. The protocol engine only ever talks
//! to the hardware through [`TwiRegisters`].

use core::ops::{BitOr, BitOrAssign};

/// TWI control register (TWCR) contents
///
/// Bit positions follow the ATmega TWCR layout. The type is a plain
/// wrapper so HALs can store it in a register as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control(u8);

impl Control {
    /// No bits set
    pub const NONE: Self = Self(0);
    /// TWINT: operation complete flag; writing 1 clears it and starts the next operation
    pub const INT: Self = Self(1 << 7);
    /// TWEA: acknowledge received bytes and own-address matches
    pub const EA: Self = Self(1 << 6);
    /// TWSTA: request a START condition
    pub const STA: Self = Self(1 << 5);
    /// TWSTO: request a STOP condition; hardware clears it once sent
    pub const STO: Self = Self(1 << 4);
    /// TWWC: write collision flag (read only)
    pub const WC: Self = Self(1 << 3);
    /// TWEN: peripheral enable
    pub const EN: Self = Self(1 << 2);
    /// TWIE: interrupt enable
    pub const IE: Self = Self(1 << 0);

    /// Build from a raw register value
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if all bits of `other` are set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Copy with the bits of `other` cleared
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Copy with the bits of `other` set
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Copy with the bits of `other` set or cleared depending on `on`
    pub const fn with_if(self, other: Self, on: bool) -> Self {
        if on {
            self.with(other)
        } else {
            self.without(other)
        }
    }
}

impl BitOr for Control {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl BitOrAssign for Control {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.with(rhs);
    }
}

/// Own-address register (TWAR) value for a 7-bit address
///
/// Bit 0 (TWGCE) enables the general call response.
pub const fn own_address_register(address: u8, general_call: bool) -> u8 {
    (address << 1) | general_call as u8
}

/// Register-level access to a TWI peripheral
///
/// Implementations map these calls onto the hardware registers of a
/// specific chip. Provided methods compose the primitive operations the
/// protocol engine issues (START, STOP, byte transfer).
///
/// # Invariants
///
/// - Only one owner per TWI peripheral
/// - No concurrent access from interrupt and foreground context
pub trait TwiRegisters {
    /// Write the bit rate register (TWBR)
    fn write_bit_rate(&mut self, divisor: u8);

    /// Write the own-address register (TWAR)
    fn write_own_address(&mut self, value: u8);

    /// Read the control register (TWCR)
    fn read_control(&self) -> Control;

    /// Write the control register (TWCR)
    fn write_control(&mut self, control: Control);

    /// Read the raw status register (TWSR), prescaler bits included
    fn read_status(&self) -> u8;

    /// Read the data register (TWDR)
    fn read_data(&self) -> u8;

    /// Write the data register (TWDR)
    fn write_data(&mut self, byte: u8);

    /// Check if the last operation has completed (TWINT set)
    fn is_complete(&self) -> bool {
        self.read_control().contains(Control::INT)
    }

    /// Check if a requested STOP has not been sent yet
    fn stop_pending(&self) -> bool {
        self.read_control().contains(Control::STO)
    }

    /// Request a START (or repeated START) condition
    fn trigger_start(&mut self) {
        self.write_control(Control::INT | Control::STA | Control::EN);
    }

    /// Request a STOP condition
    ///
    /// `idle` holds the bits that stay set once the bus is released
    /// (slave acknowledge, interrupt enable).
    fn trigger_stop(&mut self, idle: Control) {
        self.write_control(idle | Control::INT | Control::STO | Control::EN);
    }

    /// Load a byte and start transmitting it
    fn transmit(&mut self, byte: u8) {
        self.write_data(byte);
        self.write_control(Control::INT | Control::EN);
    }

    /// Start receiving the next byte, answering with ACK or NACK
    fn receive_next(&mut self, ack: bool) {
        self.write_control((Control::INT | Control::EN).with_if(Control::EA, ack));
    }
}
