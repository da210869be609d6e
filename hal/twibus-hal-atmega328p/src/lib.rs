//! ATmega328P-specific HAL for twibus
//!
//! This crate provides the memory-mapped implementation of the
//! `twibus-hal` register traits. It supports:
//!
//! - ATmega48A/PA/88A/PA/168A/PA/328/P
//! - ATmega640/1280/1281/2560/2561 (same TWI register addresses)
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! Pin pull-ups on SDA/SCL and the TWI interrupt vector are left to the
//! board support code.

#![no_std]

pub mod twi;

pub use twi::Atmega328pTwi;
