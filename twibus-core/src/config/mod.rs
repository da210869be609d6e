//! Configuration types
//!
//! Bus setup applied when the driver is created or reinitialized.

pub mod types;

pub use types::*;
