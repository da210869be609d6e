//! Shared test fixtures

use heapless::Vec;
use twibus_hal::mock::{MockDelay, MockTwi, Step};
use twibus_protocol::ProtocolError;

use crate::config::TwiConfig;
use crate::driver::Twi;
use crate::traits::ErrorReporter;

/// Reporter that keeps every report for inspection
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Vec<(ProtocolError, Option<u8>), 16>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(ProtocolError, Option<u8>)] {
        &self.reports
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&mut self, kind: ProtocolError, context: Option<u8>) {
        let _ = self.reports.push((kind, context));
    }
}

pub type TestTwi = Twi<MockTwi, MockDelay, RecordingReporter>;

/// Driver over a scripted mock, with setup traffic already cleared
pub fn driver(script: &[Step], config: TwiConfig) -> TestTwi {
    let mut twi = Twi::with_reporter(
        MockTwi::with_script(script),
        MockDelay::new(),
        RecordingReporter::new(),
        config,
    )
    .unwrap();
    twi.registers_mut().clear_traffic();
    twi
}

/// Config with a short poll budget so stalled-bus tests finish quickly
pub fn short_timeout() -> TwiConfig {
    TwiConfig {
        timeout_us: 50,
        ..TwiConfig::default()
    }
}
