use std::io;

use thiserror::Error;

use crate::types::{MetricName, SourceId};

/// Error type for source, sink, configuration, and metric-domain failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("record source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable { source_id: SourceId, reason: String },
    #[error("failed persisting result '{name}': {reason}")]
    Sink { name: MetricName, reason: String },
    #[error("metric '{metric}' is undefined: clean set has no distinct orders")]
    UndefinedMetric { metric: MetricName },
    #[error("metric worker for '{metric}' failed: {reason}")]
    Worker { metric: MetricName, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed encoding report: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
