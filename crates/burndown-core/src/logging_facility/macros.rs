//! Operation boundary macros.
//!
//! Every operation logs `start`, then exactly one of `end` or `end_error`,
//! with `component` (the calling module) and `op`. Extra `tracing` fields
//! may follow the fixed ones.

/// ```
/// # use burndown_core::log_op_start;
/// log_op_start!("build_inventory");
/// log_op_start!("build_inventory", key_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::burndown_core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// ```
/// # use burndown_core::log_op_end;
/// log_op_end!("build_inventory", duration_ms = 42);
/// log_op_end!("build_inventory", duration_ms = 42, key_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::burndown_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Logs the error's kind, stable code, and rendered message. `$err` is
/// anything convertible into `ExError`.
///
/// ```
/// # use burndown_core::{log_op_error, errors::BurndownError};
/// let err = BurndownError::SnapshotNotFound { date: "2024-01-10".to_string() };
/// log_op_error!("read_snapshot", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::burndown_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            error = %ex_err,
            $($($field)*)?
        );
    }};
}
