//! TWI driver instance
//!
//! [`Twi`] owns the register block, the delay used for bounded waits, the
//! error reporter, the configuration and the receive buffer. Nothing is
//! shared or global; every operation goes through `&mut self`.
//!
//! The master and slave engines live in their own modules and operate on
//! `Bus`, which holds everything except the buffer so a read can target
//! either the driver's buffer or a caller-supplied sink.

use embedded_hal::delay::DelayNs;
use twibus_hal::{bus_clock_hz, own_address_register, Control, TwiRegisters};
use twibus_protocol::{decode, validate, BusEvent, BusStatusCode, ProtocolError, STATUS_MASK};

use crate::buffer::ReceiveBuffer;
use crate::config::{divisor_for, ConfigError, TwiConfig};
use crate::state::{DriverState, MasterEvent};
use crate::traits::{ErrorReporter, NoopReporter};

/// Delay between two polls of the completion flag, in microseconds
pub const POLL_INTERVAL_US: u32 = 1;

/// Peripheral access shared by the master and slave engines
#[derive(Debug)]
pub(crate) struct Bus<R, D, E> {
    pub(crate) regs: R,
    pub(crate) delay: D,
    pub(crate) reporter: E,
    pub(crate) config: TwiConfig,
    pub(crate) state: DriverState,
}

impl<R, D, E> Bus<R, D, E>
where
    R: TwiRegisters,
    D: DelayNs,
    E: ErrorReporter,
{
    /// Report an error and hand it back for returning
    pub(crate) fn fail(&mut self, kind: ProtocolError, context: Option<u8>) -> ProtocolError {
        warn!("twi error: {}", kind);
        self.reporter.report(kind, context);
        kind
    }

    /// Wait for the current bus event to complete and decode its status
    pub(crate) fn wait_complete(&mut self, event: BusEvent) -> Result<BusStatusCode, ProtocolError> {
        let mut polls: u32 = 0;
        while !self.regs.is_complete() {
            if polls >= self.config.timeout_us {
                return Err(self.fail(ProtocolError::Timeout(event), None));
            }
            self.delay.delay_us(POLL_INTERVAL_US);
            polls += 1;
        }

        let raw = self.regs.read_status();
        let status = decode(raw).map_err(|e| self.fail(e, Some(raw & STATUS_MASK)))?;
        trace!("twi {}: {}", event, status.name());
        Ok(status)
    }

    /// Wait for a master event and validate its status
    ///
    /// The unrefined mismatch is reported; losing arbitration is returned
    /// as [`ProtocolError::ArbitrationLost`] and leaves the driver idle,
    /// since the hardware has already dropped out of master mode.
    pub(crate) fn expect_status(
        &mut self,
        event: BusEvent,
        expected: BusStatusCode,
        context: Option<u8>,
    ) -> Result<(), ProtocolError> {
        let observed = self.wait_complete(event)?;
        let err = match validate(observed, expected) {
            Ok(()) => return Ok(()),
            Err(e) => self.fail(e, context).refine(),
        };
        if err == ProtocolError::ArbitrationLost {
            self.advance(MasterEvent::ArbitrationLost);
        }
        Err(err)
    }

    /// Wait until the hardware has sent a requested STOP
    pub(crate) fn wait_stop_sent(&mut self) -> Result<(), ProtocolError> {
        let mut polls: u32 = 0;
        while self.regs.stop_pending() {
            if polls >= self.config.timeout_us {
                return Err(self.fail(ProtocolError::Timeout(BusEvent::Stop), None));
            }
            self.delay.delay_us(POLL_INTERVAL_US);
            polls += 1;
        }
        Ok(())
    }

    /// Apply a master state transition
    pub(crate) fn advance(&mut self, event: MasterEvent) {
        self.state = self.state.transition(event);
    }

    /// Program clock, own address and idle control bits from the config
    pub(crate) fn apply_config(&mut self) -> Result<(), ConfigError> {
        let divisor = self.config.bit_rate_divisor()?;
        self.regs.write_bit_rate(divisor);
        self.regs.write_own_address(own_address_register(
            self.config.self_address,
            self.config.general_call,
        ));
        self.regs.write_control(self.config.idle_control());
        Ok(())
    }
}

/// TWI bus driver
///
/// Generic over the register block, the delay used between polls and the
/// error reporter.
#[derive(Debug)]
pub struct Twi<R, D, E = NoopReporter> {
    pub(crate) bus: Bus<R, D, E>,
    pub(crate) buffer: ReceiveBuffer,
}

impl<R, D> Twi<R, D, NoopReporter>
where
    R: TwiRegisters,
    D: DelayNs,
{
    /// Set up the peripheral without error reporting
    pub fn new(regs: R, delay: D, config: TwiConfig) -> Result<Self, ConfigError> {
        Self::with_reporter(regs, delay, NoopReporter, config)
    }
}

impl<R, D, E> Twi<R, D, E>
where
    R: TwiRegisters,
    D: DelayNs,
    E: ErrorReporter,
{
    /// Set up the peripheral
    ///
    /// Programs the bit rate, own address and general call response, then
    /// enables the peripheral with slave acknowledge and interrupt bits as
    /// configured.
    pub fn with_reporter(
        regs: R,
        delay: D,
        reporter: E,
        config: TwiConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut twi = Self {
            bus: Bus {
                regs,
                delay,
                reporter,
                config,
                state: DriverState::Idle,
            },
            buffer: ReceiveBuffer::new(),
        };
        twi.bus.apply_config()?;
        debug!(
            "twi up: {} kHz, address {}, slave {}",
            config.bus_clock_khz,
            config.self_address,
            config.slave_mode
        );
        Ok(twi)
    }

    /// Change the bus clock
    pub fn set_freq(&mut self, khz: u16) -> Result<(), ConfigError> {
        let divisor = divisor_for(self.bus.config.cpu_frequency_hz, khz)?;
        self.bus.regs.write_bit_rate(divisor);
        self.bus.config.bus_clock_khz = khz;
        debug!(
            "twi clock {} Hz",
            bus_clock_hz(self.bus.config.cpu_frequency_hz, divisor)
        );
        Ok(())
    }

    /// Enable or disable the TWI interrupt
    ///
    /// Read-modify-write of the control register that never writes the
    /// completion flag back and never requests a bus condition.
    pub fn interrupt(&mut self, enable: bool) {
        let next = self
            .bus
            .regs
            .read_control()
            .without(Control::INT | Control::STA | Control::STO)
            .with_if(Control::IE, enable);
        self.bus.regs.write_control(next);
        self.bus.config.interrupt_driven = enable;
    }

    /// Change the own address and general call response
    pub fn reconfigure_address(
        &mut self,
        self_address: u8,
        general_call: bool,
    ) -> Result<(), ConfigError> {
        if self_address > twibus_protocol::MAX_ADDRESS {
            return Err(ConfigError::InvalidAddress(self_address));
        }
        self.bus
            .regs
            .write_own_address(own_address_register(self_address, general_call));
        self.bus.config.self_address = self_address;
        self.bus.config.general_call = general_call;
        Ok(())
    }

    /// Disable and re-enable the peripheral
    ///
    /// Clears the receive buffer and forgets any transaction in flight.
    /// This is the recovery path after a failed transaction.
    pub fn reinit(&mut self) -> Result<(), ConfigError> {
        self.bus.regs.write_control(Control::NONE);
        self.buffer.reset();
        self.bus.advance(MasterEvent::Reset);
        self.bus.apply_config()
    }

    /// Current master state
    pub fn state(&self) -> DriverState {
        self.bus.state
    }

    /// Active configuration
    pub fn config(&self) -> &TwiConfig {
        &self.bus.config
    }

    /// The receive buffer
    pub fn buffer(&self) -> &ReceiveBuffer {
        &self.buffer
    }

    /// Take the next unread byte of the receive buffer
    pub fn read_buffer(&mut self) -> Option<u8> {
        self.buffer.read_buffer()
    }

    /// Populated region of the receive buffer
    pub fn get_buffer(&self) -> &[u8] {
        self.buffer.get_buffer()
    }

    /// Number of unread bytes in the receive buffer
    pub fn available(&self) -> usize {
        self.buffer.available()
    }

    /// The register block
    pub fn registers(&self) -> &R {
        &self.bus.regs
    }

    /// The register block, mutably
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.bus.regs
    }

    /// The error reporter
    pub fn reporter(&self) -> &E {
        &self.bus.reporter
    }

    /// Give back the register block, delay and reporter
    pub fn release(self) -> (R, D, E) {
        (self.bus.regs, self.bus.delay, self.bus.reporter)
    }
}
