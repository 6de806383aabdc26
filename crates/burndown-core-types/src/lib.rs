//! Core types shared across the burndown facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RunId, RunContext
//! - **Schema constants**: Boundary field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RunContext, RunId};
