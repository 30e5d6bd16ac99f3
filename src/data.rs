use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::types::{B2bFlag, CategoryName, OrderId, PromotionTag, SizeLabel, StateCode};

/// Raw record as received from a record source, under source field names.
///
/// Every field is nullable; the pipeline makes no assumption about which
/// values a source can actually leave null. Fields beyond these ten are
/// dropped at the source boundary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// `Order ID` column.
    pub order_id: Option<String>,
    /// `Date` column, expected as `MM-dd-yy`.
    pub date: Option<String>,
    /// `Status` column.
    pub status: Option<String>,
    /// `Qty` column, an integer rendered as text.
    pub qty: Option<String>,
    /// `Amount` column, a currency value rendered as text.
    pub amount: Option<String>,
    /// `ship-state` column.
    pub ship_state: Option<String>,
    /// `Category` column.
    pub category: Option<String>,
    /// `Size` column.
    pub size: Option<String>,
    /// `B2B` column.
    pub b2b: Option<String>,
    /// `promotion-ids` column.
    pub promotion_ids: Option<String>,
}

/// Canonical record produced by the normalizer.
///
/// Coercion failures are nulls, not errors; the three defaulted fields
/// (`promotion_ids`, `is_b2b`, `size`) are always present because the
/// normalizer substitutes configured defaults for true nulls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Order identifier; null when the source value was null.
    pub order_id: Option<OrderId>,
    /// Parsed order date; null when parsing failed or the source was null.
    pub order_date: Option<NaiveDate>,
    /// Order status, unmodified.
    pub status: Option<String>,
    /// Ordered quantity; null when integer coercion failed.
    pub quantity: Option<i64>,
    /// Order amount; null when decimal coercion failed.
    pub amount: Option<f64>,
    /// Shipping state, trimmed and upper-cased.
    pub state: Option<StateCode>,
    /// Product category, trimmed.
    pub category: Option<CategoryName>,
    /// Product size, trimmed; defaulted when the source value was null.
    pub size: SizeLabel,
    /// Business flag; defaulted when the source value was null.
    pub is_b2b: B2bFlag,
    /// Promotion identifiers; defaulted when the source value was null.
    pub promotion_ids: PromotionTag,
}

/// Normalized record that passed every validity filter.
///
/// Invariants: `amount > 0`, `quantity > 0`, and `order_id`/`order_date`
/// are present. The cleaner is the only producer of this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// Order identifier, never null.
    pub order_id: OrderId,
    /// Parsed order date, never null.
    pub order_date: NaiveDate,
    /// Order status, unmodified (may still be null).
    pub status: Option<String>,
    /// Ordered quantity, strictly positive.
    pub quantity: i64,
    /// Order amount, strictly positive.
    pub amount: f64,
    /// Shipping state (may be null; groups under a null key).
    pub state: Option<StateCode>,
    /// Product category (may be null; groups under a null key).
    pub category: Option<CategoryName>,
    /// Product size, never null after default substitution.
    pub size: SizeLabel,
    /// Business flag, never null after default substitution.
    pub is_b2b: B2bFlag,
    /// Promotion identifiers, never null after default substitution.
    pub promotion_ids: PromotionTag,
}
