//! Protocol error taxonomy
//!
//! Every failure of a bus operation is one of these. They carry enough
//! context to be reported without access to the driver.

use embedded_hal::i2c::{self, NoAcknowledgeSource};

use crate::events::BusEvent;
use crate::status::BusStatusCode;

/// Errors from bus transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// A bus event completed with a status other than the expected one
    UnexpectedStatus {
        /// Status the sequence required
        expected: BusStatusCode,
        /// Status the hardware reported
        observed: BusStatusCode,
    },
    /// Another master won arbitration
    ArbitrationLost,
    /// Unexpected status while accumulating slave data
    SlaveProtocolAbort {
        /// Status that ended the receive cycle
        observed: BusStatusCode,
    },
    /// More bytes requested than the destination can hold
    RequestTooLarge {
        /// Bytes requested by the caller
        requested: usize,
        /// Bytes the destination can hold
        capacity: usize,
    },
    /// The hardware did not complete an event in time
    Timeout(BusEvent),
    /// The status register holds a value outside the status table
    UnknownStatus(u8),
    /// Target address does not fit in 7 bits
    InvalidAddress(u8),
    /// Zero-length transfer requested
    EmptyTransfer,
    /// START requested while a transaction still holds the bus
    TransactionInProgress,
}

impl ProtocolError {
    /// Status reported by the hardware, if the error carries one
    pub fn observed(&self) -> Option<BusStatusCode> {
        match self {
            ProtocolError::UnexpectedStatus { observed, .. }
            | ProtocolError::SlaveProtocolAbort { observed } => Some(*observed),
            ProtocolError::ArbitrationLost => Some(BusStatusCode::ArbitrationLost),
            _ => None,
        }
    }

    /// Turn a master-side mismatch caused by losing arbitration into
    /// [`ProtocolError::ArbitrationLost`]
    ///
    /// Covers plain arbitration loss and the codes where the peripheral was
    /// addressed as a slave right after losing.
    pub fn refine(self) -> Self {
        match self {
            ProtocolError::UnexpectedStatus { observed, .. } if observed.is_arbitration_lost() => {
                ProtocolError::ArbitrationLost
            }
            other => other,
        }
    }
}

impl core::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProtocolError::UnexpectedStatus { expected, observed } => {
                write!(f, "expected {}, observed {}", expected, observed)
            }
            ProtocolError::ArbitrationLost => write!(f, "arbitration lost"),
            ProtocolError::SlaveProtocolAbort { observed } => {
                write!(f, "slave receive aborted by {}", observed)
            }
            ProtocolError::RequestTooLarge {
                requested,
                capacity,
            } => write!(f, "requested {} bytes, capacity {}", requested, capacity),
            ProtocolError::Timeout(event) => write!(f, "timed out waiting for {}", event.name()),
            ProtocolError::UnknownStatus(raw) => write!(f, "unknown status 0x{:02X}", raw),
            ProtocolError::InvalidAddress(address) => {
                write!(f, "address 0x{:02X} is not a 7-bit address", address)
            }
            ProtocolError::EmptyTransfer => write!(f, "zero-length transfer"),
            ProtocolError::TransactionInProgress => write!(f, "transaction in progress"),
        }
    }
}

impl i2c::Error for ProtocolError {
    fn kind(&self) -> i2c::ErrorKind {
        match self {
            ProtocolError::ArbitrationLost => i2c::ErrorKind::ArbitrationLoss,
            ProtocolError::UnexpectedStatus { observed, .. } => {
                if observed.is_address_nack() {
                    i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
                } else if observed.is_data_nack() {
                    i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
                } else if observed.is_arbitration_lost() {
                    i2c::ErrorKind::ArbitrationLoss
                } else if *observed == BusStatusCode::BusError {
                    i2c::ErrorKind::Bus
                } else {
                    i2c::ErrorKind::Other
                }
            }
            _ => i2c::ErrorKind::Other,
        }
    }
}
