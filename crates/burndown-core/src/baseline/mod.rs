//! Baseline resolution: per-key adoption dates from a support evaluator.

pub mod bcd_evaluator;
pub mod resolver;

pub use bcd_evaluator::{BcdSupportEvaluator, CORE_BROWSERS};
pub use resolver::{
    BaselineResolver, EngineRelease, EvaluationFailure, SupportEvaluation, SupportEvaluator,
    UNRESOLVED_MARKERS,
};
