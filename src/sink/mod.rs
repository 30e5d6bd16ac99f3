//! Result sink interfaces and built-in sinks.
//!
//! A sink persists named result sets with overwrite semantics: after a
//! successful write the full table is visible under the name, and a failed
//! write leaves whatever was previously visible untouched. Writes for
//! different names are independent.

use std::sync::Mutex;

use indexmap::IndexMap;

use crate::errors::PipelineError;
use crate::table::MetricTable;
use crate::types::MetricName;

/// Parquet-backed columnar sink.
pub mod parquet;
pub use parquet::ParquetSink;

/// Pipeline-facing result sink interface.
pub trait ResultSink: Send + Sync {
    /// Persist `table` under `name`, replacing any prior contents.
    fn write_table(&self, name: &str, table: &MetricTable) -> Result<(), PipelineError>;

    /// Persist a scalar metric under `name` as a single-row table.
    fn write_scalar(&self, name: &str, value: f64) -> Result<(), PipelineError> {
        self.write_table(name, &MetricTable::scalar(name, value))
    }
}

/// In-memory sink for tests and embedders that forward results elsewhere.
#[derive(Default)]
pub struct MemorySink {
    results: Mutex<IndexMap<MetricName, MetricTable>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names written so far, in first-write order.
    pub fn names(&self) -> Vec<MetricName> {
        match self.results.lock() {
            Ok(results) => results.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// The table currently visible under `name`, if any.
    pub fn table(&self, name: &str) -> Option<MetricTable> {
        self.results.lock().ok()?.get(name).cloned()
    }

    /// Snapshot of every visible result.
    pub fn snapshot(&self) -> IndexMap<MetricName, MetricTable> {
        match self.results.lock() {
            Ok(results) => results.clone(),
            Err(_) => IndexMap::new(),
        }
    }
}

impl ResultSink for MemorySink {
    fn write_table(&self, name: &str, table: &MetricTable) -> Result<(), PipelineError> {
        let mut results = self.results.lock().map_err(|_| PipelineError::Sink {
            name: name.to_string(),
            reason: "memory sink lock poisoned".to_string(),
        })?;
        results.insert(name.to_string(), table.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnValues, MetricColumn};

    fn table(revenue: f64) -> MetricTable {
        MetricTable::new(vec![MetricColumn::double("revenue", vec![revenue])])
            .expect("table")
    }

    #[test]
    fn writes_overwrite_by_name() {
        let sink = MemorySink::new();
        sink.write_table("region_sales", &table(1.0)).expect("write");
        sink.write_table("region_sales", &table(2.0)).expect("write");
        assert_eq!(sink.names(), vec!["region_sales".to_string()]);
        let visible = sink.table("region_sales").expect("table");
        assert_eq!(
            visible.column("revenue").expect("column").values,
            ColumnValues::Double(vec![2.0])
        );
    }

    #[test]
    fn scalars_become_single_row_tables() {
        let sink = MemorySink::new();
        sink.write_scalar("average_order_value", 75.0).expect("write");
        let visible = sink.table("average_order_value").expect("table");
        assert_eq!(visible.row_count(), 1);
    }
}
