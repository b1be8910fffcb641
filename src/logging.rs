//! Unified logging macros for the codec.
//!
//! [`codec_log!`](crate::codec_log) forwards to whichever backend the build
//! enables:
//!
//! - `log` feature - uses the `log` crate (host tools, tests with a logger)
//! - `defmt` feature - uses `defmt` (embedded targets)
//! - neither - expands to nothing, but still type-checks the arguments
//!
//! When both features are on, `log` wins. Call sites stick to plain integers
//! and string literals so every backend can format them.
//!
//! ```rust,ignore
//! codec_log!(debug, "encoded {} octets", n);
//! codec_log!(warn, "unknown message code {}", code);
//! ```

/// Unified logging macro, selecting `log::` or `defmt::` from the features.
#[macro_export]
#[cfg(feature = "log")]
macro_rules! codec_log {
    (info, $($arg:tt)*) => { ::log::info!($($arg)*) };
    (debug, $($arg:tt)*) => { ::log::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { ::log::warn!($($arg)*) };
    (error, $($arg:tt)*) => { ::log::error!($($arg)*) };
    (trace, $($arg:tt)*) => { ::log::trace!($($arg)*) };
}

#[macro_export]
#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! codec_log {
    (info, $($arg:tt)*) => { ::defmt::info!($($arg)*) };
    (debug, $($arg:tt)*) => { ::defmt::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { ::defmt::warn!($($arg)*) };
    (error, $($arg:tt)*) => { ::defmt::error!($($arg)*) };
    (trace, $($arg:tt)*) => { ::defmt::trace!($($arg)*) };
}

#[macro_export]
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! codec_log {
    ($level:ident, $($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_all_levels_expand() {
        let n = 3usize;
        crate::codec_log!(info, "info {}", n);
        crate::codec_log!(debug, "debug {}", n);
        crate::codec_log!(warn, "warn");
        crate::codec_log!(error, "error {} {}", n, 7u8);
        crate::codec_log!(trace, "trace");
    }
}
