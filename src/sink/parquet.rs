use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int32Type, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;
use parquet::schema::types::Type;
use tracing::debug;

use crate::constants::sink::{RESULT_EXTENSION, STAGING_EXTENSION};
use crate::errors::PipelineError;
use crate::sink::ResultSink;
use crate::table::{ColumnValues, MetricTable};

/// Columnar on-disk sink: one parquet file per result name.
///
/// Each write goes to a staging file first and is renamed over the target,
/// so either the full new table is visible under a name or the prior
/// contents remain; a failed write never leaves a half-written table at the
/// target path.
pub struct ParquetSink {
    root: PathBuf,
}

impl ParquetSink {
    /// Create a sink rooted at `root`, creating the directory when missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory receiving result files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file path a name is published under.
    pub fn result_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{RESULT_EXTENSION}"))
    }

    fn staging_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{name}.{RESULT_EXTENSION}.{STAGING_EXTENSION}"))
    }

    fn write_staged(&self, name: &str, table: &MetricTable, staged: &Path) -> Result<(), PipelineError> {
        let schema = schema_for(name, table)?;
        let file = File::create(staged).map_err(|err| {
            sink_err(name, format!("failed creating {}: {err}", staged.display()))
        })?;
        let properties = Arc::new(WriterProperties::builder().build());
        let mut writer = SerializedFileWriter::new(file, schema, properties)
            .map_err(|err| sink_err(name, format!("failed opening writer: {err}")))?;

        let mut row_group = writer
            .next_row_group()
            .map_err(|err| sink_err(name, format!("failed starting row group: {err}")))?;
        for column in table.columns() {
            let mut column_writer = row_group
                .next_column()
                .map_err(|err| {
                    sink_err(name, format!("failed opening column '{}': {err}", column.name))
                })?
                .ok_or_else(|| {
                    sink_err(name, format!("schema exhausted before column '{}'", column.name))
                })?;
            let written = match &column.values {
                ColumnValues::Int32(values) => column_writer
                    .typed::<Int32Type>()
                    .write_batch(values, None, None),
                ColumnValues::Int64(values) => column_writer
                    .typed::<Int64Type>()
                    .write_batch(values, None, None),
                ColumnValues::Double(values) => column_writer
                    .typed::<DoubleType>()
                    .write_batch(values, None, None),
                ColumnValues::Utf8(values) => {
                    let def_levels: Vec<i16> = values
                        .iter()
                        .map(|value| i16::from(value.is_some()))
                        .collect();
                    let present: Vec<ByteArray> = values
                        .iter()
                        .flatten()
                        .map(|value| ByteArray::from(value.as_str()))
                        .collect();
                    column_writer.typed::<ByteArrayType>().write_batch(
                        &present,
                        Some(&def_levels),
                        None,
                    )
                }
            };
            written.map_err(|err| {
                sink_err(name, format!("failed writing column '{}': {err}", column.name))
            })?;
            column_writer
                .close()
                .map_err(|err| {
                    sink_err(name, format!("failed closing column '{}': {err}", column.name))
                })?;
        }
        row_group
            .close()
            .map_err(|err| sink_err(name, format!("failed closing row group: {err}")))?;
        writer
            .close()
            .map_err(|err| sink_err(name, format!("failed closing file: {err}")))?;
        Ok(())
    }
}

impl ResultSink for ParquetSink {
    fn write_table(&self, name: &str, table: &MetricTable) -> Result<(), PipelineError> {
        let staged = self.staging_path(name);
        if staged.exists() {
            let _ = fs::remove_file(&staged);
        }

        self.write_staged(name, table, &staged)?;

        let target = self.result_path(name);
        fs::rename(&staged, &target).map_err(|err| {
            sink_err(
                name,
                format!(
                    "failed publishing {} -> {}: {err}",
                    staged.display(),
                    target.display()
                ),
            )
        })?;
        debug!(name, rows = table.row_count(), target = %target.display(), "published result");
        Ok(())
    }
}

fn sink_err(name: &str, reason: String) -> PipelineError {
    PipelineError::Sink {
        name: name.to_string(),
        reason,
    }
}

/// Derive the parquet message schema from a table's columns.
///
/// Numeric value columns are required; string group keys are optional so
/// null keys persist as nulls instead of sentinel values.
fn schema_for(name: &str, table: &MetricTable) -> Result<Arc<Type>, PipelineError> {
    let mut fields = String::new();
    for column in table.columns() {
        let field = match &column.values {
            ColumnValues::Int32(_) => format!("required int32 {};", column.name),
            ColumnValues::Int64(_) => format!("required int64 {};", column.name),
            ColumnValues::Double(_) => format!("required double {};", column.name),
            ColumnValues::Utf8(_) => format!("optional binary {} (UTF8);", column.name),
        };
        fields.push_str(&field);
    }
    let message = format!("message {name} {{ {fields} }}");
    let schema = parse_message_type(&message)
        .map_err(|err| sink_err(name, format!("failed building schema: {err}")))?;
    Ok(Arc::new(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MetricColumn;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use parquet::record::{Field, Row};

    fn read_rows(path: &Path) -> Vec<Row> {
        let file = File::open(path).expect("open");
        let reader = SerializedFileReader::new(file).expect("reader");
        reader
            .get_row_iter(None)
            .expect("row iter")
            .map(|row| row.expect("row"))
            .collect()
    }

    fn region_table(states: Vec<Option<&str>>, revenues: Vec<f64>) -> MetricTable {
        MetricTable::new(vec![
            MetricColumn::utf8(
                "state",
                states.into_iter().map(|s| s.map(str::to_string)).collect(),
            ),
            MetricColumn::double("state_revenue", revenues),
        ])
        .expect("table")
    }

    #[test]
    fn published_tables_round_trip_including_null_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ParquetSink::new(dir.path()).expect("sink");
        let table = region_table(vec![Some("NY"), None], vec![150.0, 42.0]);
        sink.write_table("region_sales", &table).expect("write");

        let rows = read_rows(&sink.result_path("region_sales"));
        assert_eq!(rows.len(), 2);

        let fields: Vec<(String, Field)> = rows[0]
            .get_column_iter()
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect();
        assert_eq!(fields[0].0, "state");
        assert_eq!(fields[0].1, Field::Str("NY".to_string()));
        assert_eq!(fields[1].1, Field::Double(150.0));

        let null_state: Vec<(String, Field)> = rows[1]
            .get_column_iter()
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect();
        assert_eq!(null_state[0].1, Field::Null);
        assert_eq!(null_state[1].1, Field::Double(42.0));
    }

    #[test]
    fn writes_overwrite_prior_contents_wholesale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ParquetSink::new(dir.path()).expect("sink");
        sink.write_table(
            "region_sales",
            &region_table(vec![Some("NY"), Some("CA")], vec![1.0, 2.0]),
        )
        .expect("first write");
        sink.write_table("region_sales", &region_table(vec![Some("TX")], vec![3.0]))
            .expect("second write");

        let rows = read_rows(&sink.result_path("region_sales"));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn no_staging_file_remains_after_publish() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ParquetSink::new(dir.path()).expect("sink");
        sink.write_table("region_sales", &region_table(vec![Some("NY")], vec![1.0]))
            .expect("write");
        assert!(sink.result_path("region_sales").exists());
        assert!(!dir.path().join("region_sales.parquet.part").exists());
    }

    #[test]
    fn scalars_persist_as_single_row_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ParquetSink::new(dir.path()).expect("sink");
        sink.write_scalar("average_order_value", 75.0).expect("write");

        let rows = read_rows(&sink.result_path("average_order_value"));
        assert_eq!(rows.len(), 1);
        let fields: Vec<(String, Field)> = rows[0]
            .get_column_iter()
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect();
        assert_eq!(fields[0].0, "average_order_value");
        assert_eq!(fields[0].1, Field::Double(75.0));
    }

    #[test]
    fn mixed_numeric_schemas_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = ParquetSink::new(dir.path()).expect("sink");
        let table = MetricTable::new(vec![
            MetricColumn::int32("year", vec![2024]),
            MetricColumn::int32("month", vec![1]),
            MetricColumn::double("monthly_revenue", vec![150.0]),
        ])
        .expect("table");
        sink.write_table("monthly_revenue", &table).expect("write");

        let rows = read_rows(&sink.result_path("monthly_revenue"));
        let fields: Vec<(String, Field)> = rows[0]
            .get_column_iter()
            .map(|(name, field)| (name.clone(), field.clone()))
            .collect();
        assert_eq!(fields[0].1, Field::Int(2024));
        assert_eq!(fields[1].1, Field::Int(1));
        assert_eq!(fields[2].1, Field::Double(150.0));
    }
}
