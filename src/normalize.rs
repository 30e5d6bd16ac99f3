use chrono::NaiveDate;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::data::{NormalizedRecord, RawRecord};

/// Projects raw records into canonical normalized form.
///
/// Normalization never drops a record and never fails: unparseable dates and
/// numeric coercion failures propagate as nulls for the cleaner to judge.
pub struct Normalizer<'a> {
    config: &'a PipelineConfig,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer bound to a pipeline configuration.
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Normalize a whole batch, preserving cardinality and order.
    pub fn normalize_all(&self, raw: Vec<RawRecord>) -> Vec<NormalizedRecord> {
        let total = raw.len();
        let records: Vec<NormalizedRecord> =
            raw.into_iter().map(|record| self.normalize(record)).collect();
        let null_dates = records.iter().filter(|r| r.order_date.is_none()).count();
        let null_amounts = records.iter().filter(|r| r.amount.is_none()).count();
        let null_quantities = records.iter().filter(|r| r.quantity.is_none()).count();
        debug!(
            total,
            null_dates, null_amounts, null_quantities, "normalized raw records"
        );
        records
    }

    /// Normalize one record: rename, parse, trim/case, coerce, substitute
    /// defaults for true nulls.
    pub fn normalize(&self, raw: RawRecord) -> NormalizedRecord {
        let defaults = &self.config.defaults;
        NormalizedRecord {
            order_id: raw.order_id,
            order_date: raw
                .date
                .as_deref()
                .and_then(|value| self.parse_date(value)),
            status: raw.status,
            quantity: raw.qty.as_deref().and_then(coerce_integer),
            amount: raw.amount.as_deref().and_then(coerce_decimal),
            state: raw
                .ship_state
                .map(|value| value.trim().to_uppercase()),
            category: raw.category.map(|value| value.trim().to_string()),
            size: raw
                .size
                .map(|value| value.trim().to_string())
                .unwrap_or_else(|| defaults.size.clone()),
            is_b2b: raw.b2b.unwrap_or_else(|| defaults.is_b2b.clone()),
            promotion_ids: raw
                .promotion_ids
                .unwrap_or_else(|| defaults.promotion_ids.clone()),
        }
    }

    fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), &self.config.date_format).ok()
    }
}

/// Coerce an integer-rendered string; anything else is null.
fn coerce_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Coerce a decimal-rendered string; anything else is null.
fn coerce_decimal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawRecord {
        RawRecord {
            order_id: Some("order-1".to_string()),
            date: Some("01-05-24".to_string()),
            status: Some("Delivered".to_string()),
            qty: Some("2".to_string()),
            amount: Some("100.50".to_string()),
            ship_state: Some(" ny ".to_string()),
            category: Some(" Set ".to_string()),
            size: Some(" M ".to_string()),
            b2b: Some("No".to_string()),
            promotion_ids: None,
        }
    }

    #[test]
    fn renames_parses_and_cases_fields() {
        let config = PipelineConfig::default();
        let record = Normalizer::new(&config).normalize(raw());
        assert_eq!(record.order_id.as_deref(), Some("order-1"));
        assert_eq!(
            record.order_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
        assert_eq!(record.quantity, Some(2));
        assert_eq!(record.amount, Some(100.50));
        assert_eq!(record.state.as_deref(), Some("NY"));
        assert_eq!(record.category.as_deref(), Some("Set"));
        assert_eq!(record.size, "M");
    }

    #[test]
    fn coercion_failures_become_nulls_not_errors() {
        let config = PipelineConfig::default();
        let normalizer = Normalizer::new(&config);
        let record = normalizer.normalize(RawRecord {
            date: Some("2024/01/05".to_string()),
            qty: Some("two".to_string()),
            amount: Some("$100".to_string()),
            ..raw()
        });
        assert_eq!(record.order_date, None);
        assert_eq!(record.quantity, None);
        assert_eq!(record.amount, None);
    }

    #[test]
    fn defaults_apply_to_true_nulls_only() {
        let config = PipelineConfig::default();
        let normalizer = Normalizer::new(&config);

        let nulled = normalizer.normalize(RawRecord {
            size: None,
            b2b: None,
            promotion_ids: None,
            ..raw()
        });
        assert_eq!(nulled.size, "Unknown");
        assert_eq!(nulled.is_b2b, "Unknown");
        assert_eq!(nulled.promotion_ids, "No Promotion");

        // A present-but-empty string is not a null; substitution must not fire.
        let empty = normalizer.normalize(RawRecord {
            size: Some(String::new()),
            b2b: Some(String::new()),
            promotion_ids: Some(String::new()),
            ..raw()
        });
        assert_eq!(empty.size, "");
        assert_eq!(empty.is_b2b, "");
        assert_eq!(empty.promotion_ids, "");
    }

    #[test]
    fn null_default_law_leaves_non_null_neighbors_untouched() {
        let config = PipelineConfig::default();
        let record = Normalizer::new(&config).normalize(RawRecord {
            promotion_ids: None,
            b2b: Some("No".to_string()),
            ..raw()
        });
        assert_eq!(record.promotion_ids, "No Promotion");
        assert_eq!(record.is_b2b, "No");
    }

    #[test]
    fn batch_normalization_preserves_cardinality_and_order() {
        let config = PipelineConfig::default();
        let batch = vec![
            RawRecord {
                order_id: Some("a".to_string()),
                ..raw()
            },
            RawRecord {
                order_id: None,
                date: None,
                ..raw()
            },
            RawRecord {
                order_id: Some("c".to_string()),
                ..raw()
            },
        ];
        let records = Normalizer::new(&config).normalize_all(batch);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].order_id.as_deref(), Some("a"));
        assert_eq!(records[1].order_id, None);
        assert_eq!(records[1].order_date, None);
        assert_eq!(records[2].order_id.as_deref(), Some("c"));
    }

    #[test]
    fn two_digit_years_map_into_the_2000s() {
        let config = PipelineConfig::default();
        let record = Normalizer::new(&config).normalize(RawRecord {
            date: Some("12-31-99".to_string()),
            ..raw()
        });
        // chrono's %y pivot: 69-99 map to 1969-1999.
        assert_eq!(
            record.order_date,
            Some(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap())
        );
    }
}
