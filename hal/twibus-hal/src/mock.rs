//! Mock TWI peripheral for testing
//!
//! `MockTwi` plays back a script of status codes the way the hardware
//! would: every control write that clears TWINT consumes one [`Step`] and
//! sets TWINT again. All control writes and transmitted bytes are recorded
//! for test verification.

use embedded_hal::delay::DelayNs;
use heapless::{Deque, Vec};

use crate::registers::{Control, TwiRegisters};

/// Maximum number of scripted steps
pub const MAX_STEPS: usize = 64;

/// Maximum number of recorded control writes
pub const MAX_RECORDED_WRITES: usize = 128;

/// Maximum number of recorded transmitted bytes
pub const MAX_RECORDED_BYTES: usize = 64;

/// One hardware event: the status reported and the data register contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Status code reported once the operation completes
    pub status: u8,
    /// Value of the data register after the operation
    pub data: u8,
}

impl Step {
    /// Event with a status and no received data
    pub const fn status(status: u8) -> Self {
        Self { status, data: 0 }
    }

    /// Event that delivers a received byte
    pub const fn byte(status: u8, data: u8) -> Self {
        Self { status, data }
    }
}

/// Scripted TWI register block
#[derive(Debug)]
pub struct MockTwi {
    control: Control,
    status: u8,
    data: u8,
    bit_rate: u8,
    own_address: u8,
    script: Deque<Step, MAX_STEPS>,
    writes: Vec<Control, MAX_RECORDED_WRITES>,
    transmitted: Vec<u8, MAX_RECORDED_BYTES>,
    stops: usize,
    stalled: bool,
    stall_stop: bool,
}

impl Default for MockTwi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTwi {
    /// Create an idle mock ("no relevant state information" status)
    pub fn new() -> Self {
        Self {
            control: Control::NONE,
            status: 0xF8,
            data: 0,
            bit_rate: 0,
            own_address: 0,
            script: Deque::new(),
            writes: Vec::new(),
            transmitted: Vec::new(),
            stops: 0,
            stalled: false,
            stall_stop: false,
        }
    }

    /// Create a mock with the given steps queued
    pub fn with_script(steps: &[Step]) -> Self {
        let mut mock = Self::new();
        mock.script(steps);
        mock
    }

    /// Queue steps to be played back in order
    pub fn script(&mut self, steps: &[Step]) {
        for &step in steps {
            if self.script.push_back(step).is_err() {
                panic!("script longer than {} steps", MAX_STEPS);
            }
        }
    }

    /// Report `status` with TWINT set, as after an own-address match
    pub fn raise(&mut self, status: u8) {
        self.status = status;
        self.control = self.control.with(Control::INT);
    }

    /// Never complete another operation (a slave holding the clock low)
    pub fn stall(&mut self) {
        self.stalled = true;
    }

    /// Never clear TWSTO after a STOP request
    pub fn stall_stop(&mut self) {
        self.stall_stop = true;
    }

    /// All control register writes, oldest first
    pub fn control_writes(&self) -> &[Control] {
        &self.writes
    }

    /// Bytes loaded into the data register, oldest first
    pub fn transmitted(&self) -> &[u8] {
        &self.transmitted
    }

    /// Number of STOP requests seen
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Steps not yet played back
    pub fn remaining_steps(&self) -> usize {
        self.script.len()
    }

    /// Current control register value
    pub fn control(&self) -> Control {
        self.control
    }

    /// Last value written to TWBR
    pub fn bit_rate(&self) -> u8 {
        self.bit_rate
    }

    /// Last value written to TWAR
    pub fn own_address(&self) -> u8 {
        self.own_address
    }

    /// Forget recorded traffic, keeping the script
    pub fn clear_traffic(&mut self) {
        self.writes.clear();
        self.transmitted.clear();
        self.stops = 0;
    }
}

impl TwiRegisters for MockTwi {
    fn write_bit_rate(&mut self, divisor: u8) {
        self.bit_rate = divisor;
    }

    fn write_own_address(&mut self, value: u8) {
        self.own_address = value;
    }

    fn read_control(&self) -> Control {
        self.control
    }

    fn write_control(&mut self, control: Control) {
        if self.writes.push(control).is_err() {
            panic!("more than {} control writes recorded", MAX_RECORDED_WRITES);
        }

        if control.contains(Control::STO) {
            self.stops += 1;
            let released = control.without(Control::INT);
            self.control = if self.stall_stop {
                released
            } else {
                released.without(Control::STO)
            };
            return;
        }

        if !control.contains(Control::INT) {
            // Writing 0 to TWINT leaves the flag untouched
            self.control = control.with_if(Control::INT, self.control.contains(Control::INT));
            return;
        }

        match self.script.pop_front() {
            Some(step) if !self.stalled => {
                self.status = step.status;
                self.data = step.data;
                self.control = control;
            }
            _ => self.control = control.without(Control::INT),
        }
    }

    fn read_status(&self) -> u8 {
        // Prescaler bits stay at 0 (prescaler 1)
        self.status
    }

    fn read_data(&self) -> u8 {
        self.data
    }

    fn write_data(&mut self, byte: u8) {
        if self.transmitted.push(byte).is_err() {
            panic!("more than {} transmitted bytes recorded", MAX_RECORDED_BYTES);
        }
        self.data = byte;
    }
}

/// Delay that returns immediately and counts the time it was asked to wait
#[derive(Debug, Default)]
pub struct MockDelay {
    waited_ns: u64,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in nanoseconds
    pub fn waited_ns(&self) -> u64 {
        self.waited_ns
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waited_ns += ns as u64;
    }
}
