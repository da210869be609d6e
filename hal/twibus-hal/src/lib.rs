//! twibus Hardware Abstraction Layer
//!
//! This crate defines the register-level interface of a TWI (two-wire,
//! I2C-compatible) peripheral. Chip-specific HALs implement it, and the
//! protocol engine in `twibus-core` drives the bus through it only.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / embedded-hal drivers     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  twibus-core (protocol engine)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  twibus-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ twibus-hal-   │       │  mock::MockTwi│
//! │  atmega328p   │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support
//! - `mock` - Scripted register block and delay for host-side tests

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod registers;

// Re-export key items at crate root for convenience
pub use clock::{
    bit_rate_divisor, bus_clock_hz, ClockError, MAX_BUS_CLOCK_KHZ, STANDARD_BUS_CLOCK_KHZ,
};
pub use registers::{own_address_register, Control, TwiRegisters};
