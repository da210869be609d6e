//! TWI register block for the ATmega328P
//!
//! The same addresses are used by the ATmega48/88/168 and the
//! ATmega640/1280/2560 families.

use twibus_hal::{Control, TwiRegisters};

/// TWI Bit Rate Register
pub const TWBR: *mut u8 = 0x00B8 as *mut u8;
/// TWI Status Register (status in bits 7..3, prescaler in bits 1..0)
pub const TWSR: *mut u8 = 0x00B9 as *mut u8;
/// TWI (Slave) Address Register
pub const TWAR: *mut u8 = 0x00BA as *mut u8;
/// TWI Data Register
pub const TWDR: *mut u8 = 0x00BB as *mut u8;
/// TWI Control Register
pub const TWCR: *mut u8 = 0x00BC as *mut u8;

/// TWSR prescaler bits (TWPS1:0)
pub const TWSR_PRESCALER_MASK: u8 = 0x03;

/// Memory-mapped TWI peripheral
///
/// Zero-sized handle; all state lives in the hardware registers.
#[derive(Debug)]
pub struct Atmega328pTwi {
    _private: (),
}

impl Atmega328pTwi {
    /// Create the register handle
    ///
    /// # Safety
    ///
    /// Only one handle may exist at a time, and it must not be shared
    /// between interrupt and foreground context without a critical section.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl TwiRegisters for Atmega328pTwi {
    fn write_bit_rate(&mut self, divisor: u8) {
        // SAFETY: fixed I/O addresses of the TWI block; prescaler forced to 1
        unsafe {
            let status = TWSR.read_volatile();
            TWSR.write_volatile(status & !TWSR_PRESCALER_MASK);
            TWBR.write_volatile(divisor);
        }
    }

    fn write_own_address(&mut self, value: u8) {
        // SAFETY: fixed I/O address of TWAR
        unsafe { TWAR.write_volatile(value) }
    }

    fn read_control(&self) -> Control {
        // SAFETY: fixed I/O address of TWCR
        Control::from_bits(unsafe { TWCR.read_volatile() })
    }

    fn write_control(&mut self, control: Control) {
        // SAFETY: fixed I/O address of TWCR
        unsafe { TWCR.write_volatile(control.bits()) }
    }

    fn read_status(&self) -> u8 {
        // SAFETY: fixed I/O address of TWSR
        unsafe { TWSR.read_volatile() }
    }

    fn read_data(&self) -> u8 {
        // SAFETY: fixed I/O address of TWDR
        unsafe { TWDR.read_volatile() }
    }

    fn write_data(&mut self, byte: u8) {
        // SAFETY: fixed I/O address of TWDR
        unsafe { TWDR.write_volatile(byte) }
    }
}
