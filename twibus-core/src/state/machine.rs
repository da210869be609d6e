//! Driver state machines
//!
//! Master state tracks whether this driver currently holds the bus. Slave
//! state tracks one receive cycle, driven by the status after each event.

use twibus_protocol::{BusStatusCode, Direction};

use super::events::MasterEvent;

/// Master-side driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// No transaction in flight
    #[default]
    Idle,
    /// START sent; the bus is held until STOP
    Active(Direction),
}

impl DriverState {
    /// Check if a transaction holds the bus
    pub fn is_active(&self) -> bool {
        matches!(self, DriverState::Active(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: MasterEvent) -> Self {
        use DriverState::*;
        use MasterEvent::*;

        match (self, event) {
            // Plain START from Idle, or repeated START continuing a transaction
            (_, Started(direction)) => Active(direction),
            (_, StartFailed) => Idle,
            (_, Stopped) => Idle,
            (_, ArbitrationLost) => Idle,
            (_, Reset) => Idle,
        }
    }
}

/// Slave receive cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveState {
    /// Not addressed yet
    #[default]
    WaitingForAddressMatch,
    /// Addressed; collecting data bytes
    AccumulatingData,
    /// STOP received
    Completed,
    /// Unexpected status ended the cycle
    Aborted,
}

impl SlaveState {
    /// Check if the cycle has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, SlaveState::Completed | SlaveState::Aborted)
    }

    /// Process the status reported after a bus event
    pub fn transition(self, status: BusStatusCode) -> Self {
        use SlaveState::*;

        match self {
            WaitingForAddressMatch if status.is_slave_address_match() => AccumulatingData,
            WaitingForAddressMatch => WaitingForAddressMatch,
            AccumulatingData if status.is_slave_data_ack() => AccumulatingData,
            AccumulatingData if status == BusStatusCode::StopReceived => Completed,
            AccumulatingData => Aborted,
            Completed | Aborted => self,
        }
    }
}
