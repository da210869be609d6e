//! Bus events the engine waits for
//!
//! Every blocking wait in the driver is for one of these events; a wait
//! that runs out of time reports which one it was.

/// Hardware event a blocking wait is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// START or repeated START condition sent
    Start,
    /// Address + direction byte transferred
    Address,
    /// Master data byte sent
    DataWrite,
    /// Master data byte received
    DataRead,
    /// STOP condition sent
    Stop,
    /// Slave data byte or STOP received
    SlaveData,
}

impl BusEvent {
    /// Short name, for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            BusEvent::Start => "start",
            BusEvent::Address => "address",
            BusEvent::DataWrite => "data write",
            BusEvent::DataRead => "data read",
            BusEvent::Stop => "stop",
            BusEvent::SlaveData => "slave data",
        }
    }

    /// Returns true if the event belongs to a master transaction
    pub fn is_master(&self) -> bool {
        !matches!(self, BusEvent::SlaveData)
    }
}
