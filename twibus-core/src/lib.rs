//! Blocking TWI (I2C) driver core
//!
//! This crate contains the protocol engine that drives an AVR two-wire
//! peripheral through the [`TwiRegisters`](twibus_hal::TwiRegisters)
//! interface:
//!
//! - Master transactions: START, address + direction, data, STOP, with the
//!   status validated after every bus event
//! - Polled slave receive into a 32-byte buffer
//! - Bounded waits: every poll loop gives up with a timeout error
//! - Error reporting through a pluggable [`ErrorReporter`]
//! - `embedded-hal` 1.0 [`I2c`](embedded_hal::i2c::I2c) implementation
//!
//! # Example
//!
//! ```ignore
//! let regs = unsafe { Atmega328pTwi::steal() };
//! let mut twi = Twi::new(regs, delay, TwiConfig::STANDARD)?;
//!
//! twi.start_transaction(0x68, Direction::Write, false)?;
//! twi.write(0x75, false)?;
//! let id = twi.request_from(0x68, 1, true, true)?;
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod buffer;
pub mod config;
pub mod driver;
mod eh;
pub mod master;
pub mod slave;
pub mod state;
pub mod traits;

#[cfg(test)]
mod testing;

pub use buffer::{ByteSink, ReceiveBuffer, SliceSink, BUFFER_CAPACITY};
pub use config::{ConfigError, OversizeRequest, TwiConfig};
pub use driver::{Twi, POLL_INTERVAL_US};
pub use slave::SlaveReceive;
pub use state::{DriverState, SlaveState};
pub use traits::{ErrorReporter, LogReporter, NoopReporter};
pub use twibus_protocol::{BusEvent, BusStatusCode, Direction, ProtocolError};
