//! Field and event names shared by the logging macros and the test capture.
//!
//! A boundary event carries `component`, `op` and `event`; `end` and
//! `end_error` add `duration_ms`, and `end_error` adds the two `err.*` fields.
//! Pipeline events also carry `run_id`.

pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_ERR_CODE: &str = "err.code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// Every boundary event name, in emission order.
pub const BOUNDARY_EVENTS: [&str; 3] = [EVENT_START, EVENT_END, EVENT_END_ERROR];
