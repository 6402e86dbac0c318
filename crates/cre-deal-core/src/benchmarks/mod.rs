//! Industry benchmark reference data and the evaluator that rates deal
//! metrics against it.
//!
//! The default table is immutable; templates produce new tables through
//! [`BenchmarkTable::with_overrides`] rather than mutating shared state.

pub mod defaults;
pub mod evaluator;
pub mod metric;
pub mod table;
pub mod template;

pub use evaluator::{
    assess, assess_all, evaluate, evaluate_named, Classification, EvaluationResult,
    MetricAssessment, Rating,
};
pub use metric::{Metric, MetricInfo};
pub use table::{BenchmarkEntry, BenchmarkOverrides, BenchmarkTable, OverrideRow};
pub use template::DealTemplate;
