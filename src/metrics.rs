use std::collections::HashSet;
use std::thread;

use chrono::Datelike;
use indexmap::IndexMap;
use tracing::debug;

use crate::config::{PipelineConfig, Rounding};
use crate::constants::fields;
use crate::constants::outputs::{self, columns};
use crate::data::{CleanRecord, NormalizedRecord};
use crate::errors::PipelineError;
use crate::table::{MetricColumn, MetricTable};

/// Every derived output of one pipeline run.
///
/// All values are pure functions of the immutable clean set, except
/// `cancelled_orders`, which is counted over the pre-filter normalized set.
/// The whole catalog is replaced wholesale on the next run.
#[derive(Clone, Debug, PartialEq)]
pub struct Kpis {
    /// Sum of `amount` over the clean set.
    pub total_revenue: f64,
    /// Count of distinct order ids over the clean set.
    pub total_orders: u64,
    /// Sum of `quantity` over the clean set.
    pub total_quantity: i64,
    /// Count of distinct order ids with status `Cancelled` over the
    /// normalized (pre-filter) set.
    pub cancelled_orders: u64,
    /// `total_revenue / total_orders`.
    pub average_order_value: f64,
    /// `cancelled_orders / total_orders * 100`; the numerator universe is
    /// intentionally wider than the denominator's, so the rate can exceed
    /// 100 percent.
    pub cancellation_rate: f64,
    /// `total_quantity / total_orders`.
    pub average_basket_size: f64,
    /// Revenue grouped by order year and month.
    pub monthly_revenue: MetricTable,
    /// Revenue grouped by shipping state.
    pub region_sales: MetricTable,
    /// Revenue grouped by the derived promotion-usage flag.
    pub promotion_impact: MetricTable,
    /// Revenue and percentage-of-total per category, revenue descending.
    pub category_contribution: MetricTable,
    /// Revenue and market share per business flag.
    pub b2b_performance: MetricTable,
    /// Revenue per size, revenue descending.
    pub size_revenue: MetricTable,
    /// Size revenue with market-share percentage appended.
    pub size_market_share: MetricTable,
}

impl Kpis {
    /// Grouped tables paired with their persisted names, in publish order.
    pub fn tables(&self) -> [(&'static str, &MetricTable); 7] {
        [
            (outputs::MONTHLY_REVENUE, &self.monthly_revenue),
            (outputs::REGION_SALES, &self.region_sales),
            (outputs::PROMOTION_IMPACT, &self.promotion_impact),
            (outputs::CATEGORY_CONTRIBUTION, &self.category_contribution),
            (outputs::B2B_PERFORMANCE, &self.b2b_performance),
            (outputs::SIZE_REVENUE, &self.size_revenue),
            (outputs::SIZE_MARKET_SHARE, &self.size_market_share),
        ]
    }

    /// Scalar reports paired with their persisted names.
    pub fn scalars(&self) -> [(&'static str, f64); 3] {
        [
            (outputs::AVERAGE_ORDER_VALUE, self.average_order_value),
            (outputs::CANCELLATION_RATE, self.cancellation_rate),
            (outputs::AVERAGE_BASKET_SIZE, self.average_basket_size),
        ]
    }
}

/// Computes the KPI catalog from immutable record sets.
pub struct MetricsEngine<'a> {
    config: &'a PipelineConfig,
}

impl<'a> MetricsEngine<'a> {
    /// Create an engine bound to a pipeline configuration.
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Compute every KPI.
    ///
    /// The grouped tables have no mutual dependency beyond the precomputed
    /// totals, so they are fanned out on scoped worker threads; a worker
    /// failure aborts the whole computation.
    pub fn compute(
        &self,
        normalized: &[NormalizedRecord],
        clean: &[CleanRecord],
    ) -> Result<Kpis, PipelineError> {
        let total_revenue: f64 = clean.iter().map(|record| record.amount).sum();
        let total_orders = distinct_order_count(clean);
        let total_quantity: i64 = clean.iter().map(|record| record.quantity).sum();
        let cancelled_orders = cancelled_order_count(normalized);

        let average_order_value =
            ratio(total_revenue, total_orders, outputs::AVERAGE_ORDER_VALUE)?;
        let cancellation_rate = ratio(
            cancelled_orders as f64 * 100.0,
            total_orders,
            outputs::CANCELLATION_RATE,
        )?;
        let average_basket_size = ratio(
            total_quantity as f64,
            total_orders,
            outputs::AVERAGE_BASKET_SIZE,
        )?;

        let rounding = self.config.rounding;
        let no_promotion = self.config.defaults.promotion_ids.as_str();

        let (monthly_revenue, region_sales, promotion_impact, category, b2b, sizes) =
            thread::scope(|scope| {
                let monthly = scope.spawn(|| monthly_revenue(clean));
                let region = scope.spawn(|| region_sales(clean));
                let promotion = scope.spawn(|| promotion_impact(clean, no_promotion));
                let category =
                    scope.spawn(|| category_contribution(clean, total_revenue, rounding));
                let b2b = scope.spawn(|| b2b_performance(clean, total_revenue, rounding));
                let sizes = scope.spawn(|| size_tables(clean, total_revenue, rounding));
                (
                    join(outputs::MONTHLY_REVENUE, monthly),
                    join(outputs::REGION_SALES, region),
                    join(outputs::PROMOTION_IMPACT, promotion),
                    join(outputs::CATEGORY_CONTRIBUTION, category),
                    join(outputs::B2B_PERFORMANCE, b2b),
                    join(outputs::SIZE_REVENUE, sizes),
                )
            });
        let (size_revenue, size_market_share) = sizes?;

        debug!(
            total_revenue,
            total_orders, total_quantity, cancelled_orders, "computed kpi catalog"
        );

        Ok(Kpis {
            total_revenue,
            total_orders,
            total_quantity,
            cancelled_orders,
            average_order_value,
            cancellation_rate,
            average_basket_size,
            monthly_revenue: monthly_revenue?,
            region_sales: region_sales?,
            promotion_impact: promotion_impact?,
            category_contribution: category?,
            b2b_performance: b2b?,
            size_revenue,
            size_market_share,
        })
    }
}

/// Join a scoped metric worker, mapping a panic to a worker error.
fn join<'scope, T>(
    metric: &str,
    handle: thread::ScopedJoinHandle<'scope, Result<T, PipelineError>>,
) -> Result<T, PipelineError> {
    handle.join().unwrap_or_else(|_| {
        Err(PipelineError::Worker {
            metric: metric.to_string(),
            reason: "metric worker panicked".to_string(),
        })
    })
}

/// Scalar ratio over the distinct-order denominator.
///
/// A zero denominator is a domain error, never infinity or NaN.
fn ratio(numerator: f64, total_orders: u64, metric: &str) -> Result<f64, PipelineError> {
    if total_orders == 0 {
        return Err(PipelineError::UndefinedMetric {
            metric: metric.to_string(),
        });
    }
    Ok(numerator / total_orders as f64)
}

/// Count of distinct order ids over the clean set.
fn distinct_order_count(clean: &[CleanRecord]) -> u64 {
    let ids: HashSet<&str> = clean.iter().map(|record| record.order_id.as_str()).collect();
    ids.len() as u64
}

/// Count of distinct order ids among cancelled normalized records.
///
/// A null id participates as one distinct value, the SQL `DISTINCT`
/// convention for nullable columns.
fn cancelled_order_count(normalized: &[NormalizedRecord]) -> u64 {
    let ids: HashSet<Option<&str>> = normalized
        .iter()
        .filter(|record| record.status.as_deref() == Some(fields::STATUS_CANCELLED))
        .map(|record| record.order_id.as_deref())
        .collect();
    ids.len() as u64
}

fn monthly_revenue(clean: &[CleanRecord]) -> Result<MetricTable, PipelineError> {
    let mut groups: IndexMap<(i32, u32), f64> = IndexMap::new();
    for record in clean {
        let key = (record.order_date.year(), record.order_date.month());
        *groups.entry(key).or_insert(0.0) += record.amount;
    }
    MetricTable::new(vec![
        MetricColumn::int32(columns::YEAR, groups.keys().map(|(year, _)| *year).collect()),
        MetricColumn::int32(
            columns::MONTH,
            groups.keys().map(|(_, month)| *month as i32).collect(),
        ),
        MetricColumn::double(columns::MONTHLY_REVENUE, groups.values().copied().collect()),
    ])
}

fn region_sales(clean: &[CleanRecord]) -> Result<MetricTable, PipelineError> {
    let mut groups: IndexMap<Option<String>, f64> = IndexMap::new();
    for record in clean {
        *groups.entry(record.state.clone()).or_insert(0.0) += record.amount;
    }
    MetricTable::new(vec![
        MetricColumn::utf8(columns::STATE, groups.keys().cloned().collect()),
        MetricColumn::double(columns::STATE_REVENUE, groups.values().copied().collect()),
    ])
}

fn promotion_impact(
    clean: &[CleanRecord],
    no_promotion: &str,
) -> Result<MetricTable, PipelineError> {
    let mut groups: IndexMap<&str, f64> = IndexMap::new();
    for record in clean {
        let flag = if record.promotion_ids != no_promotion {
            fields::PROMOTION_USED
        } else {
            no_promotion
        };
        *groups.entry(flag).or_insert(0.0) += record.amount;
    }
    MetricTable::new(vec![
        MetricColumn::utf8(
            columns::HAS_PROMOTION,
            groups.keys().map(|flag| Some((*flag).to_string())).collect(),
        ),
        MetricColumn::double(columns::REVENUE, groups.values().copied().collect()),
    ])
}

fn category_contribution(
    clean: &[CleanRecord],
    total_revenue: f64,
    rounding: Rounding,
) -> Result<MetricTable, PipelineError> {
    let mut groups: IndexMap<Option<String>, f64> = IndexMap::new();
    for record in clean {
        *groups.entry(record.category.clone()).or_insert(0.0) += record.amount;
    }
    let mut rows: Vec<(Option<String>, f64)> = groups.into_iter().collect();
    sort_by_revenue_desc(&mut rows);
    let percentages: Vec<f64> = rows
        .iter()
        .map(|(_, revenue)| rounding.round2(revenue / total_revenue * 100.0))
        .collect();
    MetricTable::new(vec![
        MetricColumn::utf8(
            columns::CATEGORY,
            rows.iter().map(|(category, _)| category.clone()).collect(),
        ),
        MetricColumn::double(
            columns::CATEGORY_REVENUE,
            rows.iter().map(|(_, revenue)| *revenue).collect(),
        ),
        MetricColumn::double(columns::CATEGORY_PERCENTAGE, percentages),
    ])
}

fn b2b_performance(
    clean: &[CleanRecord],
    total_revenue: f64,
    rounding: Rounding,
) -> Result<MetricTable, PipelineError> {
    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for record in clean {
        *groups.entry(record.is_b2b.clone()).or_insert(0.0) += record.amount;
    }
    let shares: Vec<f64> = groups
        .values()
        .map(|revenue| rounding.round2(revenue / total_revenue * 100.0))
        .collect();
    MetricTable::new(vec![
        MetricColumn::utf8(
            columns::IS_B2B,
            groups.keys().map(|flag| Some(flag.clone())).collect(),
        ),
        MetricColumn::double(columns::REVENUE, groups.values().copied().collect()),
        MetricColumn::double(columns::MARKET_SHARE_PCT, shares),
    ])
}

/// Build `size_revenue` and `size_market_share` from one grouping pass.
///
/// The market-share table is the revenue table with a percentage column
/// appended, so both share ordering and revenue values by construction.
fn size_tables(
    clean: &[CleanRecord],
    total_revenue: f64,
    rounding: Rounding,
) -> Result<(MetricTable, MetricTable), PipelineError> {
    let mut groups: IndexMap<Option<String>, f64> = IndexMap::new();
    for record in clean {
        *groups.entry(Some(record.size.clone())).or_insert(0.0) += record.amount;
    }
    let mut rows: Vec<(Option<String>, f64)> = groups.into_iter().collect();
    sort_by_revenue_desc(&mut rows);

    let sizes: Vec<Option<String>> = rows.iter().map(|(size, _)| size.clone()).collect();
    let revenues: Vec<f64> = rows.iter().map(|(_, revenue)| *revenue).collect();
    let shares: Vec<f64> = revenues
        .iter()
        .map(|revenue| rounding.round2(revenue / total_revenue * 100.0))
        .collect();

    let size_revenue = MetricTable::new(vec![
        MetricColumn::utf8(columns::SIZE, sizes.clone()),
        MetricColumn::double(columns::SIZE_REVENUE, revenues.clone()),
    ])?;
    let size_market_share = MetricTable::new(vec![
        MetricColumn::utf8(columns::SIZE, sizes),
        MetricColumn::double(columns::SIZE_REVENUE, revenues),
        MetricColumn::double(columns::MARKET_SHARE_PCT, shares),
    ])?;
    Ok((size_revenue, size_market_share))
}

/// Revenue-descending order with a deterministic key tie-break.
fn sort_by_revenue_desc(rows: &mut [(Option<String>, f64)]) {
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}
