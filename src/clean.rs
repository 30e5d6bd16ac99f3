use tracing::debug;

use crate::data::{CleanRecord, NormalizedRecord};
use crate::truth::{self, Truth};

/// Filters normalized records down to the canonical clean set.
///
/// The predicate is evaluated in three-valued logic:
/// `amount > 0 AND quantity > 0 AND order_id IS NOT NULL AND
/// order_date IS NOT NULL AND amount IS NOT NULL`.
/// Quantity carries no explicit null check; `null > 0` is unknown and
/// unknown excludes, which is equivalent.
pub struct Cleaner;

impl Cleaner {
    /// Keep the records whose validity predicate evaluates `True`,
    /// preserving input order.
    pub fn clean_all(records: &[NormalizedRecord]) -> Vec<CleanRecord> {
        let total = records.len();
        let clean: Vec<CleanRecord> = records.iter().filter_map(Self::clean).collect();
        debug!(
            total,
            kept = clean.len(),
            dropped = total - clean.len(),
            "applied validity filters"
        );
        clean
    }

    /// Evaluate the validity predicate for one record and materialize it on
    /// success.
    pub fn clean(record: &NormalizedRecord) -> Option<CleanRecord> {
        if !Self::verdict(record).is_true() {
            return None;
        }
        // The predicate just proved these fields present and positive.
        match (&record.order_id, record.order_date, record.quantity, record.amount) {
            (Some(order_id), Some(order_date), Some(quantity), Some(amount)) => {
                Some(CleanRecord {
                    order_id: order_id.clone(),
                    order_date,
                    status: record.status.clone(),
                    quantity,
                    amount,
                    state: record.state.clone(),
                    category: record.category.clone(),
                    size: record.size.clone(),
                    is_b2b: record.is_b2b.clone(),
                    promotion_ids: record.promotion_ids.clone(),
                })
            }
            _ => None,
        }
    }

    fn verdict(record: &NormalizedRecord) -> Truth {
        truth::gt(record.amount, 0.0)
            .and(truth::gt(record.quantity, 0))
            .and(truth::is_not_null(&record.order_id))
            .and(truth::is_not_null(&record.order_date))
            .and(truth::is_not_null(&record.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn normalized(order_id: &str) -> NormalizedRecord {
        NormalizedRecord {
            order_id: Some(order_id.to_string()),
            order_date: NaiveDate::from_ymd_opt(2024, 1, 5),
            status: Some("Delivered".to_string()),
            quantity: Some(2),
            amount: Some(100.0),
            state: Some("NY".to_string()),
            category: Some("Set".to_string()),
            size: "M".to_string(),
            is_b2b: "No".to_string(),
            promotion_ids: "No Promotion".to_string(),
        }
    }

    #[test]
    fn valid_record_passes_and_materializes() {
        let record = Cleaner::clean(&normalized("order-1")).expect("clean");
        assert_eq!(record.order_id, "order-1");
        assert_eq!(record.quantity, 2);
        assert_eq!(record.amount, 100.0);
    }

    #[test]
    fn null_quantity_is_excluded_without_an_explicit_null_check() {
        let record = NormalizedRecord {
            quantity: None,
            ..normalized("order-1")
        };
        assert!(Cleaner::clean(&record).is_none());
    }

    #[test]
    fn non_positive_values_are_excluded() {
        for quantity in [Some(0), Some(-1)] {
            let record = NormalizedRecord {
                quantity,
                ..normalized("order-1")
            };
            assert!(Cleaner::clean(&record).is_none());
        }
        let record = NormalizedRecord {
            amount: Some(0.0),
            ..normalized("order-1")
        };
        assert!(Cleaner::clean(&record).is_none());
    }

    #[test]
    fn null_id_date_or_amount_is_excluded() {
        let no_id = NormalizedRecord {
            order_id: None,
            ..normalized("order-1")
        };
        let no_date = NormalizedRecord {
            order_date: None,
            ..normalized("order-1")
        };
        let no_amount = NormalizedRecord {
            amount: None,
            ..normalized("order-1")
        };
        assert!(Cleaner::clean(&no_id).is_none());
        assert!(Cleaner::clean(&no_date).is_none());
        assert!(Cleaner::clean(&no_amount).is_none());
    }

    #[test]
    fn null_status_state_and_category_are_still_clean() {
        let record = NormalizedRecord {
            status: None,
            state: None,
            category: None,
            ..normalized("order-1")
        };
        let clean = Cleaner::clean(&record).expect("clean");
        assert_eq!(clean.status, None);
        assert_eq!(clean.state, None);
        assert_eq!(clean.category, None);
    }

    #[test]
    fn batch_cleaning_preserves_order_of_survivors() {
        let records = vec![
            normalized("a"),
            NormalizedRecord {
                amount: None,
                ..normalized("b")
            },
            normalized("c"),
        ];
        let clean = Cleaner::clean_all(&records);
        let ids: Vec<&str> = clean.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn every_clean_record_upholds_the_positivity_invariant() {
        let records = vec![
            normalized("a"),
            NormalizedRecord {
                quantity: Some(-2),
                ..normalized("b")
            },
            NormalizedRecord {
                amount: Some(f64::NAN),
                ..normalized("d")
            },
        ];
        let clean = Cleaner::clean_all(&records);
        assert!(clean.iter().all(|r| r.amount > 0.0 && r.quantity > 0));
    }
}
