//! Master transaction engine
//!
//! Sequences START, address + direction, data phases and STOP, validating
//! the status after every hardware event. Nothing is retried: the first
//! mismatch is reported and returned.
//!
//! ```text
//! write:  START ─ SLA+W ─ DATA ─ ... ─ DATA ─ [STOP]
//! read:   START ─ SLA+R ─ DATA(ACK) ─ ... ─ DATA(NACK) ─ [STOP]
//! ```

use embedded_hal::delay::DelayNs;
use twibus_hal::TwiRegisters;
use twibus_protocol::{address_byte, BusEvent, BusStatusCode, Direction, ProtocolError};

use crate::buffer::ByteSink;
use crate::config::OversizeRequest;
use crate::driver::{Bus, Twi};
use crate::state::MasterEvent;
use crate::traits::ErrorReporter;

impl<R, D, E> Bus<R, D, E>
where
    R: TwiRegisters,
    D: DelayNs,
    E: ErrorReporter,
{
    /// Checks done before any bus traffic; returns the address byte
    pub(crate) fn check_start(
        &mut self,
        address: u8,
        direction: Direction,
        repeated_start: bool,
    ) -> Result<u8, ProtocolError> {
        let byte = address_byte(address, direction)
            .ok_or_else(|| self.fail(ProtocolError::InvalidAddress(address), Some(address)))?;
        if !repeated_start && self.state.is_active() {
            return Err(self.fail(ProtocolError::TransactionInProgress, Some(byte)));
        }
        Ok(byte)
    }

    /// Send START (or repeated START) and the address byte
    pub(crate) fn start(
        &mut self,
        address: u8,
        direction: Direction,
        repeated_start: bool,
    ) -> Result<(), ProtocolError> {
        let byte = self.check_start(address, direction, repeated_start)?;
        debug!("twi start: address {=u8:#x}, {}", address, direction);

        let expected = if repeated_start {
            BusStatusCode::RepeatedStart
        } else {
            BusStatusCode::Start
        };
        self.regs.trigger_start();
        if let Err(e) = self.expect_status(BusEvent::Start, expected, Some(byte)) {
            self.advance(MasterEvent::StartFailed);
            return Err(e);
        }
        self.advance(MasterEvent::Started(direction));

        self.regs.transmit(byte);
        self.expect_status(BusEvent::Address, direction.address_ack(), Some(byte))
    }

    /// Send one data byte
    pub(crate) fn write_byte(&mut self, data: u8) -> Result<(), ProtocolError> {
        trace!("twi write {=u8:#x}", data);
        self.regs.transmit(data);
        self.expect_status(BusEvent::DataWrite, BusStatusCode::DataWriteAck, Some(data))
    }

    /// Receive `count` bytes into `sink`
    ///
    /// Every byte is acknowledged except the last one when `nack_last` is
    /// set. Bytes received before a failure stay in the sink.
    pub(crate) fn read_bytes<S: ByteSink + ?Sized>(
        &mut self,
        count: usize,
        nack_last: bool,
        sink: &mut S,
    ) -> Result<(), ProtocolError> {
        for n in 0..count {
            let ack = !(nack_last && n + 1 == count);
            let expected = if ack {
                BusStatusCode::DataReadAck
            } else {
                BusStatusCode::DataReadNack
            };
            self.regs.receive_next(ack);
            self.expect_status(BusEvent::DataRead, expected, None)?;

            let byte = self.regs.read_data();
            trace!("twi read {=u8:#x}", byte);
            let stored = sink.push_byte(byte);
            debug_assert!(stored, "read count exceeds sink capacity");
        }
        Ok(())
    }

    /// Resolve how many bytes a read may transfer into a sink with `capacity` room
    pub(crate) fn plan_read(&mut self, count: usize, capacity: usize) -> Result<usize, ProtocolError> {
        if count == 0 {
            return Err(self.fail(ProtocolError::EmptyTransfer, None));
        }
        if count <= capacity {
            return Ok(count);
        }

        let err = ProtocolError::RequestTooLarge {
            requested: count,
            capacity,
        };
        match self.config.oversize_request {
            OversizeRequest::Truncate if capacity > 0 => {
                self.fail(err, None);
                Ok(capacity)
            }
            _ => Err(self.fail(err, None)),
        }
    }

    /// Addressed read of up to `count` bytes into `sink`
    ///
    /// Returns the number of bytes received. Requests rejected before the
    /// bus is touched never send STOP.
    pub(crate) fn request<S: ByteSink + ?Sized>(
        &mut self,
        address: u8,
        count: usize,
        send_stop: bool,
        repeated_start: bool,
        sink: &mut S,
    ) -> Result<usize, ProtocolError> {
        self.check_start(address, Direction::Read, repeated_start)?;
        let n = self.plan_read(count, sink.remaining())?;

        let result = self
            .start(address, Direction::Read, repeated_start)
            .and_then(|()| self.read_bytes(n, true, sink))
            .map(|()| n);
        self.finish(result, send_stop)
    }

    /// Send STOP and wait until the hardware has put it on the bus
    ///
    /// The configured idle control bits are re-armed with the STOP request.
    /// The driver stays active if the STOP is never confirmed.
    pub(crate) fn stop(&mut self) -> Result<(), ProtocolError> {
        debug!("twi stop");
        let idle = self.config.idle_control();
        self.regs.trigger_stop(idle);
        self.wait_stop_sent()?;
        self.advance(MasterEvent::Stopped);
        Ok(())
    }

    /// Optionally send STOP after an operation, whatever its outcome
    ///
    /// The operation's own error takes precedence over a STOP failure.
    pub(crate) fn finish<T>(
        &mut self,
        result: Result<T, ProtocolError>,
        send_stop: bool,
    ) -> Result<T, ProtocolError> {
        if !send_stop {
            return result;
        }
        let stopped = self.stop();
        let value = result?;
        stopped.map(|()| value)
    }
}

impl<R, D, E> Twi<R, D, E>
where
    R: TwiRegisters,
    D: DelayNs,
    E: ErrorReporter,
{
    /// Begin a transaction with the target at `address`
    ///
    /// A plain START is refused while a transaction holds the bus; a
    /// repeated START continues it. If the START itself fails the driver is
    /// idle again. If the address phase fails the bus is still held and the
    /// caller must [`stop_trans`](Self::stop_trans) or restart.
    pub fn start_transaction(
        &mut self,
        address: u8,
        direction: Direction,
        repeated_start: bool,
    ) -> Result<(), ProtocolError> {
        self.bus.start(address, direction, repeated_start)
    }

    /// Send one data byte, optionally followed by STOP
    ///
    /// STOP is sent even if the byte was not acknowledged.
    pub fn write(&mut self, data: u8, send_stop: bool) -> Result<(), ProtocolError> {
        let result = self.bus.write_byte(data);
        self.bus.finish(result, send_stop)
    }

    /// Send a burst of data bytes, optionally followed by STOP
    ///
    /// Stops at the first byte that is not acknowledged.
    pub fn write_all(&mut self, data: &[u8], send_stop: bool) -> Result<(), ProtocolError> {
        let result = data.iter().try_for_each(|&byte| self.bus.write_byte(byte));
        self.bus.finish(result, send_stop)
    }

    /// Read `count` bytes from `address` into the receive buffer
    ///
    /// Requests larger than the buffer follow the configured
    /// [`OversizeRequest`] policy. Returns the received bytes.
    pub fn request_from(
        &mut self,
        address: u8,
        count: u8,
        send_stop: bool,
        repeated_start: bool,
    ) -> Result<&[u8], ProtocolError> {
        self.buffer.reset();
        self.bus.request(
            address,
            count as usize,
            send_stop,
            repeated_start,
            &mut self.buffer,
        )?;
        Ok(self.buffer.get_buffer())
    }

    /// Read `count` bytes from `address` into a caller-supplied sink
    ///
    /// The receive buffer is left untouched. Returns the number of bytes
    /// received.
    pub fn request_into<S: ByteSink + ?Sized>(
        &mut self,
        address: u8,
        count: u8,
        send_stop: bool,
        repeated_start: bool,
        sink: &mut S,
    ) -> Result<usize, ProtocolError> {
        self.bus
            .request(address, count as usize, send_stop, repeated_start, sink)
    }

    /// Send STOP and release the bus
    ///
    /// Safe to call when no transaction is in flight.
    pub fn stop_trans(&mut self) -> Result<(), ProtocolError> {
        self.bus.stop()
    }
}
