//! Burndown Core - snapshot/diff pipeline for web-features adoption tracking
//!
//! This crate holds the pure domain of the burndown reports:
//! - Source adapters normalizing the compatibility corpus, the feature
//!   catalog, the support matrix and documentation citations
//! - Deterministic inventory building
//! - Baseline resolution over a pluggable support evaluator
//! - The snapshot document, its digests, and the delta engine
//! - Text, row, Markdown and burndown renderers
//!
//! Filesystem persistence lives in `burndown-store`; orchestration in
//! `burndown-engine`.

pub mod baseline;
pub mod cache;
pub mod csv;
pub mod diff;
pub mod errors;
pub mod inventory_builder;
pub mod logging_facility;
pub mod model;
pub mod render;
pub mod snapshot;
pub mod sources;

// Used by the logging macros
pub use burndown_core_types;

// Re-export commonly used types
pub use errors::{BurndownError, ExError, ExErrorKind, ExResult, Result};
pub use inventory_builder::{build_inventory, InventoryInputs};
pub use model::{BaselineResult, CompatKey, CorpusRefs, Inventory};
pub use snapshot::Snapshot;
