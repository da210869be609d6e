//! Error reporter trait
//!
//! The engines hand every failure to an [`ErrorReporter`] before returning
//! it. Rendering (console, log, counters) is the reporter's business.

use twibus_protocol::{BusStatusCode, ProtocolError};

/// Consumer of protocol errors
pub trait ErrorReporter {
    /// Report an error
    ///
    /// `context` is the byte involved in the failure: the address byte for
    /// START/address failures, the data byte for write failures, the masked
    /// status for slave aborts and unknown statuses.
    fn report(&mut self, kind: ProtocolError, context: Option<u8>);
}

impl<T: ErrorReporter + ?Sized> ErrorReporter for &mut T {
    fn report(&mut self, kind: ProtocolError, context: Option<u8>) {
        (**self).report(kind, context)
    }
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&mut self, _kind: ProtocolError, _context: Option<u8>) {}
}

/// Reporter that logs every error and counts them
///
/// Errors that carry a hardware status are logged with the datasheet
/// description of that status.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter {
    reported: u32,
    last_status: Option<BusStatusCode>,
}

impl LogReporter {
    /// Create a new log reporter
    pub const fn new() -> Self {
        Self {
            reported: 0,
            last_status: None,
        }
    }

    /// Number of errors reported so far
    pub fn reported(&self) -> u32 {
        self.reported
    }

    /// Description of the status carried by the latest error, if any
    pub fn last_description(&self) -> Option<&'static str> {
        self.last_status.map(BusStatusCode::description)
    }
}

impl ErrorReporter for LogReporter {
    fn report(&mut self, kind: ProtocolError, context: Option<u8>) {
        self.reported = self.reported.saturating_add(1);
        self.last_status = kind.observed();

        match self.last_status {
            Some(status) => warn!(
                "twi: {} ({}) (context {})",
                kind,
                status.description(),
                context
            ),
            None => warn!("twi: {} (context {})", kind, context),
        }
    }
}
