#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Cleaner stage: validity filtering with three-valued predicates.
pub mod clean;
/// Pipeline configuration types.
pub mod config;
/// Centralized constants: source schema, field defaults, output names.
pub mod constants;
/// Raw, normalized, and clean record types.
pub mod data;
/// KPI computation over immutable record sets.
pub mod metrics;
/// Normalizer stage: projection, coercion, and default substitution.
pub mod normalize;
/// Run orchestration: fetch, normalize, clean, compute, publish.
pub mod pipeline;
/// Scalar report formatting and export.
pub mod report;
/// Result sink interfaces and built-in sinks.
pub mod sink;
/// Record source interfaces and built-in sources.
pub mod source;
/// Named columnar result-set types.
pub mod table;
/// Three-valued logic for null-aware filter predicates.
pub mod truth;
/// Shared type aliases.
pub mod types;

mod errors;

pub use clean::Cleaner;
pub use config::{FieldDefaults, PipelineConfig, Rounding};
pub use data::{CleanRecord, NormalizedRecord, RawRecord};
pub use errors::PipelineError;
pub use metrics::{Kpis, MetricsEngine};
pub use normalize::Normalizer;
pub use pipeline::Pipeline;
pub use report::ScalarReport;
pub use sink::{MemorySink, ParquetSink, ResultSink};
pub use source::{CsvSource, InMemorySource, RecordSource};
pub use table::{ColumnValues, MetricColumn, MetricTable};
pub use truth::Truth;
pub use types::{MetricName, OrderId, SourceId};
