//! Bus clock configuration
//!
//! SCL frequency = CPU clock / (16 + 2 * TWBR * prescaler). The driver
//! always runs with a prescaler of 1, so only TWBR is computed here.

/// Highest bus clock the peripheral supports (fast mode)
pub const MAX_BUS_CLOCK_KHZ: u16 = 400;

/// Standard mode bus clock
pub const STANDARD_BUS_CLOCK_KHZ: u16 = 100;

/// Errors from bus clock calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Requested frequency is zero or above [`MAX_BUS_CLOCK_KHZ`]
    OutOfRange,
    /// Requested frequency is too high for the CPU clock
    TooFast,
    /// Requested frequency is too low to fit the 8-bit divisor
    TooSlow,
}

/// Compute the TWBR divisor for a bus clock in kHz
pub fn bit_rate_divisor(cpu_hz: u32, bus_khz: u16) -> Result<u8, ClockError> {
    if bus_khz == 0 || bus_khz > MAX_BUS_CLOCK_KHZ {
        return Err(ClockError::OutOfRange);
    }

    let ratio = cpu_hz / (bus_khz as u32 * 1000);
    let divisor = ratio.checked_sub(16).ok_or(ClockError::TooFast)? / 2;
    u8::try_from(divisor).map_err(|_| ClockError::TooSlow)
}

/// Bus clock in Hz produced by a TWBR divisor
pub fn bus_clock_hz(cpu_hz: u32, divisor: u8) -> u32 {
    cpu_hz / (16 + 2 * divisor as u32)
}
