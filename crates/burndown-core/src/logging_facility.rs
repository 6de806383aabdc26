//! Structured logging.
//!
//! One [`init`] call per process picks a [`Profile`]. Operations log their
//! boundaries through [`log_op_start!`](crate::log_op_start),
//! [`log_op_end!`](crate::log_op_end) and
//! [`log_op_error!`](crate::log_op_error); tests assert on them through
//! [`test_capture`].

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
