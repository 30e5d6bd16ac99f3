use serde::{Deserialize, Serialize};

use crate::constants::fields;

/// Two-decimal rounding rule applied to percentage columns.
///
/// The two conventions diverge on exact halves (`0.125` rounds to `0.13`
/// under half-up and `0.12` under half-even), so the rule is fixed once per
/// run instead of being left to the float formatter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rounding {
    /// Round halves away from zero (SQL `ROUND` semantics).
    HalfUp,
    /// Round halves to the nearest even digit (banker's rounding).
    HalfEven,
}

impl Rounding {
    /// Round `value` to two decimal places under this rule.
    pub fn round2(self, value: f64) -> f64 {
        let scaled = value * 100.0;
        let rounded = match self {
            Rounding::HalfUp => scaled.signum() * (scaled.abs() + 0.5).floor(),
            Rounding::HalfEven => scaled.round_ties_even(),
        };
        rounded / 100.0
    }
}

/// Defaults substituted for true-null field values during normalization.
///
/// Substitution is an explicit table (`field -> default, applied iff the
/// source value is null`), never a mutation of non-null values: a
/// present-but-empty string keeps its value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefaults {
    /// Value used when `promotion_ids` is null.
    pub promotion_ids: String,
    /// Value used when `is_b2b` is null.
    pub is_b2b: String,
    /// Value used when `size` is null (applied after trimming).
    pub size: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            promotion_ids: fields::DEFAULT_PROMOTION.to_string(),
            is_b2b: fields::DEFAULT_B2B.to_string(),
            size: fields::DEFAULT_SIZE.to_string(),
        }
    }
}

/// Immutable per-run pipeline configuration.
///
/// One value is threaded explicitly through every stage; there is no ambient
/// session state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// chrono format string accepted for order dates.
    pub date_format: String,
    /// Null-default substitution table.
    pub defaults: FieldDefaults,
    /// Rounding rule for percentage columns.
    pub rounding: Rounding,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_format: fields::DATE_FORMAT.to_string(),
            defaults: FieldDefaults::default(),
            rounding: Rounding::HalfUp,
        }
    }
}
