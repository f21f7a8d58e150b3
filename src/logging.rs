//! Logging macros shared by the firmware and the host build.
//!
//! - `esp32`: forwards to `defmt`, printed through `esp-println`
//! - host: forwards to the `log` facade (`env_logger` in the replay tool)
//!
//! Arguments must be `defmt::Format` on the firmware side, so only
//! primitives, `&str` and crate types that derive `Format` under `esp32`
//! are passed to these macros.

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::error!($($arg)*);

        #[cfg(not(feature = "esp32"))]
        ::log::error!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::warn!($($arg)*);

        #[cfg(not(feature = "esp32"))]
        ::log::warn!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::info!($($arg)*);

        #[cfg(not(feature = "esp32"))]
        ::log::info!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::debug!($($arg)*);

        #[cfg(not(feature = "esp32"))]
        ::log::debug!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32")]
        ::defmt::trace!($($arg)*);

        #[cfg(not(feature = "esp32"))]
        ::log::trace!($($arg)*);
    }};
}
