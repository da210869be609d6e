//! Driver state machines
//!
//! Explicit, finite, and deterministic: every transition is a function of
//! the current state and an event.

pub mod events;
pub mod machine;

pub use events::MasterEvent;
pub use machine::{DriverState, SlaveState};
