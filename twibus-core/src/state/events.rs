//! Events that trigger driver state transitions

use twibus_protocol::Direction;

/// Master-side events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MasterEvent {
    /// START (or repeated START) acknowledged by the hardware
    Started(Direction),
    /// START or repeated START not confirmed
    StartFailed,
    /// STOP sent, bus released
    Stopped,
    /// Another master took the bus
    ArbitrationLost,
    /// Peripheral reinitialized
    Reset,
}
