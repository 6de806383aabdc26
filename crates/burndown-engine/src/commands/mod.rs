//! Command orchestration layer.
//!
//! Each command coordinates the pure domain in `burndown-core` with the
//! stores in `burndown-store` and the injected ports.

pub mod burndown;
pub mod compare;
pub mod generate;
pub mod historic;
pub mod load_sqlite;
pub mod pipeline;
pub mod publish;
