//! Logging facilities for Fetchgrid.
//!
//! Fetchgrid uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; to see logs, install one in your application or
//! test:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // ... application code ...
//! }
//! ```
//!
//! Each subsystem logs under its own target so output can be filtered with
//! `tracing` directives, e.g. `RUST_LOG=fetchgrid::controller=trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "fetchgrid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "fetchgrid_core::signal";
    /// List controller target.
    pub const CONTROLLER: &str = "fetchgrid::controller";
    /// Store and result-set target.
    pub const STORE: &str = "fetchgrid::store";
    /// In-memory reference store target.
    pub const MEMORY: &str = "fetchgrid::memory";
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` crate macros with consistent
/// target naming.
#[macro_export]
macro_rules! fg_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "fetchgrid_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! fg_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "fetchgrid_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! fg_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "fetchgrid_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! fg_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "fetchgrid_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! fg_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "fetchgrid_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_emit_through_installed_subscriber() {
        // First test to install wins; the rest share it.
        tracing_subscriber::fmt().with_test_writer().try_init().ok();

        fg_trace!("trace message");
        fg_debug!(value = 1, "debug message");
        fg_info!("info message");
        fg_warn!("warn message");
        fg_error!("error message");
    }

    #[test]
    fn test_targets_are_distinct() {
        use super::targets;
        let all = [
            targets::CORE,
            targets::SIGNAL,
            targets::CONTROLLER,
            targets::STORE,
            targets::MEMORY,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
