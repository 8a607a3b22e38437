//! Logging shims.
//!
//! Forwards to `defmt` and/or the `log` facade depending on the enabled features.
//! With neither feature the arguments are type-checked and discarded. Only pass
//! primitives and string slices so both backends accept the same format string.

macro_rules! emit {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => { $crate::log::emit!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { $crate::log::emit!(info, $($arg)*) };
}

macro_rules! warning {
    ($($arg:tt)*) => { $crate::log::emit!(warn, $($arg)*) };
}

pub(crate) use {debug, emit, info, warning};
