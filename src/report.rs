use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::metrics::Kpis;

/// Scalar summary of one pipeline run.
///
/// Carries the three headline ratios plus the totals they derive from, for
/// embedders that persist or forward the summary instead of the full
/// catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalarReport {
    /// Sum of `amount` over the clean set.
    pub total_revenue: f64,
    /// Count of distinct order ids over the clean set.
    pub total_orders: u64,
    /// Sum of `quantity` over the clean set.
    pub total_quantity: i64,
    /// Count of distinct cancelled order ids over the normalized set.
    pub cancelled_orders: u64,
    /// Average order value.
    pub average_order_value: f64,
    /// Cancellation rate percentage.
    pub cancellation_rate: f64,
    /// Average basket size.
    pub average_basket_size: f64,
}

impl From<&Kpis> for ScalarReport {
    fn from(kpis: &Kpis) -> Self {
        Self {
            total_revenue: kpis.total_revenue,
            total_orders: kpis.total_orders,
            total_quantity: kpis.total_quantity,
            cancelled_orders: kpis.cancelled_orders,
            average_order_value: kpis.average_order_value,
            cancellation_rate: kpis.cancellation_rate,
            average_basket_size: kpis.average_basket_size,
        }
    }
}

impl ScalarReport {
    /// Pretty JSON rendering of the report.
    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON rendering to `path`, staged and renamed atomically.
    pub fn write_json_to(&self, path: &Path) -> Result<(), PipelineError> {
        let staged = path.with_extension("json.part");
        fs::write(&staged, self.to_json()?)?;
        fs::rename(&staged, path)?;
        Ok(())
    }
}

impl fmt::Display for ScalarReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AOV: {:.2}", self.average_order_value)?;
        writeln!(f, "Cancellation Rate: {:.2}%", self.cancellation_rate)?;
        write!(f, "Average Basket Size: {:.2}", self.average_basket_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ScalarReport {
        ScalarReport {
            total_revenue: 150.0,
            total_orders: 2,
            total_quantity: 3,
            cancelled_orders: 1,
            average_order_value: 75.0,
            cancellation_rate: 50.0,
            average_basket_size: 1.5,
        }
    }

    #[test]
    fn display_prints_the_three_headline_lines() {
        let rendered = report().to_string();
        assert_eq!(
            rendered,
            "AOV: 75.00\nCancellation Rate: 50.00%\nAverage Basket Size: 1.50"
        );
    }

    #[test]
    fn json_round_trips() {
        let json = report().to_json().expect("json");
        let parsed: ScalarReport = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, report());
    }

    #[test]
    fn json_file_lands_atomically_at_the_target_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scalars.json");
        report().write_json_to(&path).expect("write");
        assert!(path.exists());
        assert!(!dir.path().join("scalars.json.part").exists());
    }
}
