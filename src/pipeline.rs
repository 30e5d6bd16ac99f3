use tracing::{debug, info};

use crate::clean::Cleaner;
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::metrics::{Kpis, MetricsEngine};
use crate::normalize::Normalizer;
use crate::report::ScalarReport;
use crate::sink::ResultSink;
use crate::source::RecordSource;

/// Batch, run-to-completion orchestration over one immutable input snapshot.
///
/// A run is fail-fast: a source failure aborts before any metric is
/// computed, a metric failure aborts before anything is published, and a
/// sink failure aborts the run with per-name atomicity bounding the damage.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with an explicit configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The configuration threaded through every stage.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fetch, normalize, clean, and compute the KPI catalog without
    /// publishing anything.
    pub fn compute(&self, source: &dyn RecordSource) -> Result<Kpis, PipelineError> {
        info!(source_id = source.id(), "fetching raw snapshot");
        let raw = source.fetch()?;
        info!(source_id = source.id(), records = raw.len(), "fetched raw snapshot");

        let normalized = Normalizer::new(&self.config).normalize_all(raw);
        let clean = Cleaner::clean_all(&normalized);
        info!(
            normalized = normalized.len(),
            clean = clean.len(),
            "materialized record sets"
        );

        MetricsEngine::new(&self.config).compute(&normalized, &clean)
    }

    /// Run the whole pipeline: compute the catalog, publish every named
    /// result through the sink, and return the scalar report.
    pub fn run(
        &self,
        source: &dyn RecordSource,
        sink: &dyn ResultSink,
    ) -> Result<ScalarReport, PipelineError> {
        let kpis = self.compute(source)?;

        for (name, table) in kpis.tables() {
            sink.write_table(name, table)?;
            debug!(name, rows = table.row_count(), "persisted result table");
        }
        for (name, value) in kpis.scalars() {
            sink.write_scalar(name, value)?;
            debug!(name, value, "persisted scalar report");
        }
        info!("published kpi catalog");

        Ok(ScalarReport::from(&kpis))
    }
}
