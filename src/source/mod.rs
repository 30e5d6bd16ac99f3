//! Record source interfaces and built-in sources.
//!
//! Ownership model:
//! - `RecordSource` is the pipeline-facing loader interface; it yields one
//!   finite snapshot of raw records per run.
//! - Transport, credentials, and retry policy live behind the trait; the
//!   core only requires that a fetch either returns the complete snapshot
//!   or fails before any metric is computed.

use crate::data::RawRecord;
use crate::errors::PipelineError;
use crate::types::SourceId;

/// CSV-backed record source.
pub mod csv;
pub use csv::CsvSource;

/// Pipeline-facing loader interface.
///
/// For a fixed upstream state, fetch output should be deterministic; the
/// pipeline's idempotence guarantee is relative to the snapshot a source
/// returns.
pub trait RecordSource: Send + Sync {
    /// Stable source identifier used in records, logs, and errors.
    fn id(&self) -> &str;
    /// Fetch the complete, finite raw-record snapshot for this run.
    fn fetch(&self) -> Result<Vec<RawRecord>, PipelineError>;
}

/// In-memory source for tests and embedders that already hold records.
pub struct InMemorySource {
    source_id: SourceId,
    records: Vec<RawRecord>,
}

impl InMemorySource {
    /// Create a source over an owned record snapshot.
    pub fn new(source_id: impl Into<SourceId>, records: Vec<RawRecord>) -> Self {
        Self {
            source_id: source_id.into(),
            records,
        }
    }
}

impl RecordSource for InMemorySource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn fetch(&self) -> Result<Vec<RawRecord>, PipelineError> {
        Ok(self.records.clone())
    }
}
