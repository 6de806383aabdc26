//! Delta engine: compares two snapshots.

pub mod engine;
pub mod model;
pub mod percent;

pub use engine::compute_delta;
pub use model::{
    CountChange, Delta, DeltaClassification, DeltaIdentity, Metric, PercentChange, Ratio,
    RatioChange, Section,
};
