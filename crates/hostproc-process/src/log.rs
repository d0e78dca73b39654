//! Quiet-mode aware logging. When HOSTPROC_QUIET=1 (e.g. when embedded in a
//! long-running host), `[INFO]` lines are suppressed.
//! Uses `tracing::info!` so output is captured by the tracing subscriber.

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        if !$crate::log::is_quiet() {
            tracing::info!($($arg)*);
        }
    }};
}

pub fn is_quiet() -> bool {
    hostproc_core::config::ObservabilityConfig::from_env().quiet
}
