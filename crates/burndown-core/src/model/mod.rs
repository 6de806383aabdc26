//! Domain model: identifiers, corpus references, inventories and baseline results.

pub mod baseline;
pub mod corpus_ref;
pub mod identifiers;
pub mod inventory;

pub use baseline::{BaselineDate, BaselineResult, BaselineSummary};
pub use corpus_ref::CorpusRefs;
pub use identifiers::{CaniuseId, CompatKey, FeatureId};
pub use inventory::{CitationFact, CitingEntity, Inventory, InventoryEntry};
