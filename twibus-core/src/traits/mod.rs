//! Collaborator traits
//!
//! Interfaces the driver calls out to but does not implement itself.

pub mod reporter;

pub use reporter::{ErrorReporter, LogReporter, NoopReporter};
