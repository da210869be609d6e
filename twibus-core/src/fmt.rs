//! Logging macros
//!
//! Forward to `defmt` when the `defmt` feature is enabled. Otherwise the
//! arguments are only borrowed, so log-only bindings stay used.
//!
//! Declared with `#[macro_use]` ahead of the other modules; the macros are
//! in textual scope everywhere in the crate and need no import.

#![allow(unused_macros)]

macro_rules! trace {
    ($($x:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($x)*);
        #[cfg(not(feature = "defmt"))]
        log_args!($($x)*);
    }};
}

macro_rules! debug {
    ($($x:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($x)*);
        #[cfg(not(feature = "defmt"))]
        log_args!($($x)*);
    }};
}

macro_rules! warn {
    ($($x:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($x)*);
        #[cfg(not(feature = "defmt"))]
        log_args!($($x)*);
    }};
}

macro_rules! error {
    ($($x:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($x)*);
        #[cfg(not(feature = "defmt"))]
        log_args!($($x)*);
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! log_args {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}
