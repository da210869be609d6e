//! TWI bus protocol definitions
//!
//! This crate defines the wire contract of the two-wire serial bus as seen
//! through an AVR TWI peripheral: the status codes the hardware reports
//! after every bus event, the address byte layout, and the validator that
//! decides whether an event succeeded.
//!
//! # Transaction Overview
//!
//! Master transactions are validated step by step:
//! ```text
//! ┌───────┬──────────────┬──────────┬─────┬──────────┬──────┐
//! │ START │ ADDR + R/W   │ DATA     │ ... │ DATA     │ STOP │
//! │ 0x08  │ 0x18 / 0x40  │ 0x28/50  │     │ 0x28/58  │      │
//! └───────┴──────────────┴──────────┴─────┴──────────┴──────┘
//! ```
//!
//! A repeated START reports 0x10 instead of 0x08. Slave receive starts
//! with 0x60 (own address) or 0x70 (general call) and ends with 0xA0.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod address;
pub mod error;
pub mod events;
pub mod status;
pub mod validate;

pub use address::{address_byte, Direction, GENERAL_CALL_ADDRESS, MAX_ADDRESS};
pub use error::ProtocolError;
pub use events::BusEvent;
pub use status::{BusStatusCode, STATUS_MASK};
pub use validate::{decode, validate, validate_register};
