//! Slave receive engine
//!
//! Polled: [`Twi::receive`] checks whether the peripheral has been
//! addressed and, if so, collects the master's data bytes into the receive
//! buffer until STOP. The control register value found on entry is written
//! back on every exit, so polling never disturbs the slave configuration.

use embedded_hal::delay::DelayNs;
use twibus_hal::{Control, TwiRegisters};
use twibus_protocol::{decode, BusEvent, BusStatusCode, ProtocolError, STATUS_MASK};

use crate::buffer::{ByteSink, ReceiveBuffer};
use crate::driver::{Bus, Twi};
use crate::state::SlaveState;
use crate::traits::ErrorReporter;

/// Outcome of one slave receive poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveReceive {
    /// Own address or general call not matched; nothing happened
    NotAddressed,
    /// STOP received; `len` bytes are ready to drain
    Completed {
        /// Bytes received
        len: usize,
    },
}

impl<R, D, E> Bus<R, D, E>
where
    R: TwiRegisters,
    D: DelayNs,
    E: ErrorReporter,
{
    pub(crate) fn receive_into(
        &mut self,
        buffer: &mut ReceiveBuffer,
    ) -> Result<SlaveReceive, ProtocolError> {
        // A completion flag during a master transaction belongs to the master engine
        if !self.regs.is_complete() || self.state.is_active() {
            return Ok(SlaveReceive::NotAddressed);
        }

        let raw = self.regs.read_status();
        let status = match decode(raw) {
            Ok(status) => status,
            Err(e) => {
                self.fail(e, Some(raw & STATUS_MASK));
                self.release_unhandled(false);
                return Ok(SlaveReceive::NotAddressed);
            }
        };
        if SlaveState::WaitingForAddressMatch.transition(status) != SlaveState::AccumulatingData {
            let err = ProtocolError::UnexpectedStatus {
                expected: BusStatusCode::OwnAddressReceived,
                observed: status,
            };
            self.fail(err, Some(status.to_byte()));
            self.release_unhandled(status == BusStatusCode::BusError);
            return Ok(SlaveReceive::NotAddressed);
        }

        let saved = self.regs.read_control();
        buffer.reset();
        debug!("twi slave addressed");

        let result = self.accumulate(buffer);
        self.regs.write_control(saved);
        result
    }

    /// Clear a completion flag no engine handles
    ///
    /// The peripheral holds SCL low while the flag is set. After a bus
    /// error the STOP bit is set as well, which only resets the hardware
    /// state and puts nothing on the bus.
    fn release_unhandled(&mut self, bus_error: bool) {
        let control = self
            .regs
            .read_control()
            .without(Control::STA | Control::STO)
            .with(Control::INT)
            .with_if(Control::STO, bus_error);
        self.regs.write_control(control);
    }

    /// Collect data bytes until STOP or an unexpected status
    fn accumulate(&mut self, buffer: &mut ReceiveBuffer) -> Result<SlaveReceive, ProtocolError> {
        let mut state = SlaveState::AccumulatingData;
        loop {
            // A full buffer answers the next byte with NACK
            self.regs.receive_next(!buffer.is_full());
            let status = self.wait_complete(BusEvent::SlaveData)?;

            state = state.transition(status);
            match state {
                SlaveState::AccumulatingData => {
                    let byte = self.regs.read_data();
                    trace!("twi slave byte {=u8:#x}", byte);
                    let stored = buffer.push_byte(byte);
                    debug_assert!(stored, "acknowledged byte with a full buffer");
                }
                SlaveState::Completed => {
                    buffer.rewind();
                    debug!("twi slave received {} bytes", buffer.available());
                    return Ok(SlaveReceive::Completed {
                        len: buffer.available(),
                    });
                }
                SlaveState::WaitingForAddressMatch | SlaveState::Aborted => {
                    let err = ProtocolError::SlaveProtocolAbort { observed: status };
                    return Err(self.fail(err, Some(status.to_byte())));
                }
            }
        }
    }
}

impl<R, D, E> Twi<R, D, E>
where
    R: TwiRegisters,
    D: DelayNs,
    E: ErrorReporter,
{
    /// Poll for an inbound slave write
    ///
    /// Returns [`SlaveReceive::NotAddressed`] unless the own address or the
    /// general call address has been matched. Any other pending status is
    /// reported and its completion flag cleared so the bus is not held.
    /// After a match, blocks until STOP and returns the number of bytes now
    /// readable through [`read_buffer`](Self::read_buffer).
    ///
    /// On [`ProtocolError::SlaveProtocolAbort`] the bytes received so far
    /// remain in the buffer.
    pub fn receive(&mut self) -> Result<SlaveReceive, ProtocolError> {
        self.bus.receive_into(&mut self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BUFFER_CAPACITY;
    use crate::config::TwiConfig;
    use crate::testing::{driver, TestTwi};
    use twibus_hal::mock::Step;
    use twibus_hal::Control;
    use twibus_protocol::BusStatusCode;

    const OWN_ADDRESS: u8 = 0x60;
    const GENERAL_CALL: u8 = 0x70;
    const STOP: Step = Step::status(0xA0);

    fn addressed(entry: u8, script: &[Step]) -> TestTwi {
        let mut config = TwiConfig::slave(0x10);
        config.general_call = true;
        let mut twi = driver(script, config);
        twi.registers_mut().raise(entry);
        twi
    }

    #[test]
    fn test_not_addressed_without_flag() {
        let mut twi = driver(&[], TwiConfig::slave(0x10));
        assert_eq!(twi.receive(), Ok(SlaveReceive::NotAddressed));
        assert!(twi.registers().control_writes().is_empty());
    }

    #[test]
    fn test_unhandled_status_releases_bus() {
        let mut twi = driver(&[], TwiConfig::slave(0x10));
        twi.registers_mut().raise(0xA8);

        assert_eq!(twi.receive(), Ok(SlaveReceive::NotAddressed));
        assert!(!twi.registers().is_complete());
        assert_eq!(
            twi.registers().control_writes(),
            &[Control::INT | Control::EN | Control::EA]
        );
        assert_eq!(twi.registers().stops(), 0);
        assert_eq!(
            twi.reporter().reports(),
            &[(
                ProtocolError::UnexpectedStatus {
                    expected: BusStatusCode::OwnAddressReceived,
                    observed: BusStatusCode::OwnAddressReadAck,
                },
                Some(0xA8)
            )]
        );

        // Nothing left pending for the next poll
        assert_eq!(twi.receive(), Ok(SlaveReceive::NotAddressed));
        assert_eq!(twi.reporter().reports().len(), 1);
    }

    #[test]
    fn test_stale_stop_is_cleared() {
        let mut twi = driver(&[], TwiConfig::slave(0x10));
        twi.registers_mut().raise(0xA0);
        assert_eq!(twi.receive(), Ok(SlaveReceive::NotAddressed));
        assert!(!twi.registers().is_complete());
    }

    #[test]
    fn test_bus_error_resets_with_stop_bit() {
        let mut twi = driver(&[], TwiConfig::slave(0x10));
        twi.registers_mut().raise(0x00);

        assert_eq!(twi.receive(), Ok(SlaveReceive::NotAddressed));
        assert!(!twi.registers().is_complete());
        assert_eq!(twi.registers().stops(), 1);
        assert!(!twi.registers().stop_pending());
    }

    #[test]
    fn test_unknown_status_releases_bus() {
        let mut twi = driver(&[], TwiConfig::slave(0x10));
        twi.registers_mut().raise(0xD0);

        assert_eq!(twi.receive(), Ok(SlaveReceive::NotAddressed));
        assert!(!twi.registers().is_complete());
        assert_eq!(
            twi.reporter().reports(),
            &[(ProtocolError::UnknownStatus(0xD0), Some(0xD0))]
        );
    }

    #[test]
    fn test_master_transaction_is_left_alone() {
        let mut twi = driver(
            &[Step::status(0x08), Step::status(0x18)],
            TwiConfig::slave(0x10),
        );
        twi.start_transaction(0x22, twibus_protocol::Direction::Write, false)
            .unwrap();
        twi.registers_mut().clear_traffic();

        assert_eq!(twi.receive(), Ok(SlaveReceive::NotAddressed));
        assert!(twi.registers().is_complete());
        assert!(twi.registers().control_writes().is_empty());
    }

    #[test]
    fn test_receive_two_bytes() {
        let mut twi = addressed(
            OWN_ADDRESS,
            &[Step::byte(0x80, 0x11), Step::byte(0x80, 0x22), STOP],
        );
        let saved = twi.registers().control();

        assert_eq!(twi.receive(), Ok(SlaveReceive::Completed { len: 2 }));
        assert_eq!(twi.get_buffer(), &[0x11, 0x22]);
        assert_eq!(twi.buffer().index(), 0);
        assert_eq!(twi.read_buffer(), Some(0x11));
        assert_eq!(twi.read_buffer(), Some(0x22));
        assert_eq!(twi.read_buffer(), None);

        let writes = twi.registers().control_writes();
        let ack = Control::INT | Control::EN | Control::EA;
        assert_eq!(&writes[..3], &[ack, ack, ack]);
        assert_eq!(writes[3], saved);
        assert!(twi.reporter().reports().is_empty());
    }

    #[test]
    fn test_general_call_receive() {
        let mut twi = addressed(GENERAL_CALL, &[Step::byte(0x90, 0x05), STOP]);
        assert_eq!(twi.receive(), Ok(SlaveReceive::Completed { len: 1 }));
        assert_eq!(twi.get_buffer(), &[0x05]);
    }

    #[test]
    fn test_addressed_after_arbitration_lost() {
        let mut twi = addressed(0x68, &[Step::byte(0x80, 0x33), STOP]);
        assert_eq!(twi.receive(), Ok(SlaveReceive::Completed { len: 1 }));
    }

    #[test]
    fn test_empty_write() {
        let mut twi = addressed(OWN_ADDRESS, &[STOP]);
        assert_eq!(twi.receive(), Ok(SlaveReceive::Completed { len: 0 }));
        assert_eq!(twi.read_buffer(), None);
    }

    #[test]
    fn test_abort_keeps_partial_buffer() {
        let mut twi = addressed(
            OWN_ADDRESS,
            &[Step::byte(0x80, 0x11), Step::status(0x38)],
        );
        let saved = twi.registers().control();

        let expected = ProtocolError::SlaveProtocolAbort {
            observed: BusStatusCode::ArbitrationLost,
        };
        assert_eq!(twi.receive(), Err(expected));
        assert_eq!(twi.get_buffer(), &[0x11]);
        assert_eq!(twi.available(), 1);
        assert_eq!(twi.reporter().reports(), &[(expected, Some(0x38))]);

        let writes = twi.registers().control_writes();
        assert_eq!(writes[writes.len() - 1], saved);
    }

    #[test]
    fn test_full_buffer_nacks_next_byte() {
        let mut script: std::vec::Vec<Step> = (0..BUFFER_CAPACITY as u8)
            .map(|b| Step::byte(0x80, b))
            .collect();
        script.push(Step::byte(0x88, 0xFF));
        let mut twi = addressed(OWN_ADDRESS, &script);

        assert_eq!(
            twi.receive(),
            Err(ProtocolError::SlaveProtocolAbort {
                observed: BusStatusCode::AddressedDataNack,
            })
        );
        assert_eq!(twi.available(), BUFFER_CAPACITY);

        let writes = twi.registers().control_writes();
        assert!(writes[BUFFER_CAPACITY - 1].contains(Control::EA));
        assert!(!writes[BUFFER_CAPACITY].contains(Control::EA));
    }

    #[test]
    fn test_timeout_restores_control() {
        let mut config = TwiConfig::slave(0x10);
        config.timeout_us = 20;
        let mut twi = driver(&[Step::byte(0x80, 1)], config);
        twi.registers_mut().raise(OWN_ADDRESS);
        let saved = twi.registers().control();

        assert_eq!(
            twi.receive(),
            Err(ProtocolError::Timeout(BusEvent::SlaveData))
        );
        assert_eq!(twi.get_buffer(), &[1]);
        let writes = twi.registers().control_writes();
        assert_eq!(writes[writes.len() - 1], saved);
    }

    #[test]
    fn test_repeated_polls() {
        let mut twi = addressed(OWN_ADDRESS, &[Step::byte(0x80, 1), STOP]);
        assert_eq!(twi.receive(), Ok(SlaveReceive::Completed { len: 1 }));

        twi.registers_mut().script(&[Step::byte(0x80, 2), Step::byte(0x80, 3), STOP]);
        twi.registers_mut().raise(OWN_ADDRESS);
        assert_eq!(twi.receive(), Ok(SlaveReceive::Completed { len: 2 }));
        assert_eq!(twi.get_buffer(), &[2, 3]);
    }
}
