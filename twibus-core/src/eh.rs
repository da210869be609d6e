//! embedded_hal I2C trait implementation
//!
//! Lets device drivers written against `embedded-hal` 1.0 run on the TWI
//! master engine.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use twibus_hal::TwiRegisters;
use twibus_protocol::{Direction, ProtocolError};

use crate::buffer::SliceSink;
use crate::driver::{Bus, Twi};
use crate::traits::ErrorReporter;

fn direction_of(operation: &Operation<'_>) -> Direction {
    match operation {
        Operation::Read(_) => Direction::Read,
        Operation::Write(_) => Direction::Write,
    }
}

impl<R, D, E> Bus<R, D, E>
where
    R: TwiRegisters,
    D: DelayNs,
    E: ErrorReporter,
{
    /// Run operations; consecutive operations of one kind share an address phase
    fn run_operations(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ProtocolError> {
        let mut current: Option<Direction> = None;

        for i in 0..operations.len() {
            let direction = direction_of(&operations[i]);
            let next = operations.get(i + 1).map(direction_of);

            if current != Some(direction) {
                self.start(address, direction, current.is_some())?;
                current = Some(direction);
            }

            match &mut operations[i] {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        self.write_byte(byte)?;
                    }
                }
                Operation::Read(buf) => {
                    let count = buf.len();
                    // Only the last byte of a run of reads is answered with NACK
                    let nack_last = next != Some(Direction::Read);
                    self.read_bytes(count, nack_last, &mut SliceSink::new(&mut buf[..]))?;
                }
            }
        }
        Ok(())
    }
}

impl<R, D, E> ErrorType for Twi<R, D, E> {
    type Error = ProtocolError;
}

impl<R, D, E> I2c<SevenBitAddress> for Twi<R, D, E>
where
    R: TwiRegisters,
    D: DelayNs,
    E: ErrorReporter,
{
    /// Execute the operations as one bus transaction
    ///
    /// A change from writing to reading (or back) issues a repeated START.
    /// The transaction always ends with STOP, also after an error. Empty
    /// read buffers are refused before touching the bus, since the
    /// peripheral cannot end a read without receiving a byte.
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if operations.is_empty() {
            return Ok(());
        }
        let empty_read = operations
            .iter()
            .any(|op| matches!(op, Operation::Read(buf) if buf.is_empty()));
        if empty_read {
            return Err(self.bus.fail(ProtocolError::EmptyTransfer, None));
        }
        self.bus
            .check_start(address, direction_of(&operations[0]), false)?;

        let result = self.bus.run_operations(address, operations);
        self.bus.finish(result, true)
    }
}
