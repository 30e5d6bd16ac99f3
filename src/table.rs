use crate::errors::PipelineError;
use crate::types::ColumnName;

/// Column payload for a metric result set.
///
/// Group keys derived from nullable fields use `Utf8` with per-row nulls;
/// numeric value columns are always fully populated.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValues {
    /// 32-bit integers (calendar year/month columns).
    Int32(Vec<i32>),
    /// 64-bit integers (counts, quantities).
    Int64(Vec<i64>),
    /// 64-bit floats (revenue and percentage columns).
    Double(Vec<f64>),
    /// Nullable UTF-8 strings (group keys).
    Utf8(Vec<Option<String>>),
}

impl ColumnValues {
    /// Number of rows in this column.
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Int32(values) => values.len(),
            ColumnValues::Int64(values) => values.len(),
            ColumnValues::Double(values) => values.len(),
            ColumnValues::Utf8(values) => values.len(),
        }
    }

    /// Returns `true` when the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column inside a metric result set.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricColumn {
    /// Column name as persisted by the sink.
    pub name: ColumnName,
    /// Column payload.
    pub values: ColumnValues,
}

impl MetricColumn {
    /// Build an `Int32` column.
    pub fn int32(name: impl Into<ColumnName>, values: Vec<i32>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Int32(values),
        }
    }

    /// Build an `Int64` column.
    pub fn int64(name: impl Into<ColumnName>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Int64(values),
        }
    }

    /// Build a `Double` column.
    pub fn double(name: impl Into<ColumnName>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Double(values),
        }
    }

    /// Build a nullable `Utf8` column.
    pub fn utf8(name: impl Into<ColumnName>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Utf8(values),
        }
    }
}

/// A named result set: one or more grouping-key columns plus one or more
/// numeric value columns, all with the same row count.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricTable {
    columns: Vec<MetricColumn>,
}

impl MetricTable {
    /// Build a table, rejecting ragged column lengths.
    pub fn new(columns: Vec<MetricColumn>) -> Result<Self, PipelineError> {
        if columns.is_empty() {
            return Err(PipelineError::Configuration(
                "metric table requires at least one column".to_string(),
            ));
        }
        let rows = columns[0].values.len();
        if let Some(ragged) = columns.iter().find(|column| column.values.len() != rows) {
            return Err(PipelineError::Configuration(format!(
                "metric table column '{}' has {} rows, expected {}",
                ragged.name,
                ragged.values.len(),
                rows
            )));
        }
        Ok(Self { columns })
    }

    /// Single-row, single-column table carrying a scalar metric.
    pub fn scalar(name: impl Into<ColumnName>, value: f64) -> Self {
        Self {
            columns: vec![MetricColumn::double(name, vec![value])],
        }
    }

    /// Columns in persisted order.
    pub fn columns(&self) -> &[MetricColumn] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&MetricColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Number of rows shared by every column.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |column| column.values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_columns() {
        let result = MetricTable::new(vec![
            MetricColumn::utf8("state", vec![Some("NY".to_string())]),
            MetricColumn::double("state_revenue", vec![1.0, 2.0]),
        ]);
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn rejects_empty_tables() {
        assert!(MetricTable::new(Vec::new()).is_err());
    }

    #[test]
    fn scalar_is_a_one_row_table() {
        let table = MetricTable::scalar("average_order_value", 75.0);
        assert_eq!(table.row_count(), 1);
        let column = table.column("average_order_value").expect("column");
        assert_eq!(column.values, ColumnValues::Double(vec![75.0]));
    }
}
