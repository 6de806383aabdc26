//! Burndown Engine - Orchestration layer
//!
//! Runs the report pipeline end to end over explicit ports: corpus
//! resolution, content checkout, clock, confirmation and publishing are all
//! injected, so every command here can be driven by test doubles.

pub mod commands;
pub mod ports;

pub use commands::pipeline::{run_pipeline, PipelineOptions, PipelineOutput, PipelinePorts};
pub use ports::{
    CaniuseHistory, Clock, Confirm, CorpusResolver, FixedClock, PackageInstaller, Publisher,
    ResolvedCorpora, SystemClock,
};
