//! Configuration type definitions

use twibus_hal::{
    bit_rate_divisor, ClockError, Control, MAX_BUS_CLOCK_KHZ, STANDARD_BUS_CLOCK_KHZ,
};
use twibus_protocol::MAX_ADDRESS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default CPU clock (Arduino Nano / Uno / Mega)
pub const DEFAULT_CPU_FREQUENCY_HZ: u32 = 16_000_000;

/// Default poll budget for one bus event, in microseconds
pub const DEFAULT_TIMEOUT_US: u32 = 1_000_000;

/// What to do when a read asks for more bytes than the destination holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OversizeRequest {
    /// Read as many bytes as fit, report the overflow, and succeed
    #[default]
    Truncate,
    /// Fail before touching the bus
    Reject,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Own address does not fit in 7 bits
    InvalidAddress(u8),
    /// Bus clock is zero or above the peripheral limit
    ClockOutOfRange(u16),
    /// Bus clock cannot be reached from the CPU clock
    DivisorOutOfRange,
}

impl From<ClockError> for ConfigError {
    fn from(_: ClockError) -> Self {
        ConfigError::DivisorOutOfRange
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidAddress(address) => {
                write!(f, "own address 0x{:02X} is not a 7-bit address", address)
            }
            ConfigError::ClockOutOfRange(khz) => {
                write!(f, "bus clock {} kHz outside 1..={}", khz, MAX_BUS_CLOCK_KHZ)
            }
            ConfigError::DivisorOutOfRange => write!(f, "bus clock divisor out of range"),
        }
    }
}

/// TWI peripheral configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwiConfig {
    /// 7-bit address answered in slave mode
    pub self_address: u8,
    /// Bus clock in kHz (1..=400)
    pub bus_clock_khz: u16,
    /// Acknowledge own address (slave receive)
    pub slave_mode: bool,
    /// Also respond to the general call address
    pub general_call: bool,
    /// Enable the TWI interrupt
    pub interrupt_driven: bool,
    /// CPU clock used for the divisor calculation
    pub cpu_frequency_hz: u32,
    /// Poll budget for each bus event, in microseconds
    pub timeout_us: u32,
    /// Handling of reads larger than the destination
    pub oversize_request: OversizeRequest,
}

impl Default for TwiConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TwiConfig {
    /// Standard mode master (100 kHz)
    pub const STANDARD: Self = Self {
        self_address: 0,
        bus_clock_khz: STANDARD_BUS_CLOCK_KHZ,
        slave_mode: false,
        general_call: false,
        interrupt_driven: false,
        cpu_frequency_hz: DEFAULT_CPU_FREQUENCY_HZ,
        timeout_us: DEFAULT_TIMEOUT_US,
        oversize_request: OversizeRequest::Truncate,
    };

    /// Fast mode master (400 kHz)
    pub const FAST: Self = Self {
        bus_clock_khz: MAX_BUS_CLOCK_KHZ,
        ..Self::STANDARD
    };

    /// Slave receiver answering `address`
    pub const fn slave(address: u8) -> Self {
        Self {
            self_address: address,
            slave_mode: true,
            ..Self::STANDARD
        }
    }

    /// Check address and clock settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.self_address > MAX_ADDRESS {
            return Err(ConfigError::InvalidAddress(self.self_address));
        }
        self.bit_rate_divisor().map(|_| ())
    }

    /// TWBR value for the configured bus clock
    pub fn bit_rate_divisor(&self) -> Result<u8, ConfigError> {
        divisor_for(self.cpu_frequency_hz, self.bus_clock_khz)
    }

    /// Control bits the peripheral rests with between transactions
    pub fn idle_control(&self) -> Control {
        Control::EN
            .with_if(Control::EA, self.slave_mode)
            .with_if(Control::IE, self.interrupt_driven)
    }
}

/// TWBR value for a bus clock, with range errors mapped to [`ConfigError`]
pub(crate) fn divisor_for(cpu_hz: u32, khz: u16) -> Result<u8, ConfigError> {
    match bit_rate_divisor(cpu_hz, khz) {
        Err(ClockError::OutOfRange) => Err(ConfigError::ClockOutOfRange(khz)),
        other => Ok(other?),
    }
}
