//! Snapshot schema and digests.
//!
//! Persistence lives in `burndown-store`; this module only defines the
//! document and the values derived from it.

pub mod digest;
pub mod report;

pub use digest::{compute_semantic_digest, compute_snapshot_digest};
pub use report::{
    file_stem, snapshot_file_name, BcdSection, CaniuseSection, ContentSection, KeyListing,
    Snapshot, SnapshotCounts, SnapshotMeta, WebFeaturesSection,
};
