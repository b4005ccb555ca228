//! Logging macros used across the workspace.
//!
//! They forward to `tracing`, so callers only need this crate in scope. The
//! terminal layer decides how each target is rendered.

#[doc(hidden)]
pub use tracing as __tracing;

/// Target for events that mark a positive result.
pub const SUCCESS_TARGET: &str = "osprobe::success";

/// Target for raw lines that should be printed without a prefix.
pub const PRINT_TARGET: &str = "osprobe::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::log::__tracing::info!(target: "osprobe::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log::__tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log::__tracing::debug!($($arg)*)
    };
}
