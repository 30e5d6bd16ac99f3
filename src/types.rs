/// Unique order identifier as received from the source.
/// Example: `405-8078784-5731545`
pub type OrderId = String;
/// Identifier for the source that produced a batch of raw records.
/// Examples: `sales_csv`, `salesdb.sales`
pub type SourceId = String;
/// Upper-cased, trimmed shipping-state code or name.
/// Examples: `NY`, `MAHARASHTRA`
pub type StateCode = String;
/// Trimmed product category label.
/// Examples: `Set`, `kurta`, `Western Dress`
pub type CategoryName = String;
/// Trimmed size label; `Unknown` when the source value was null.
/// Examples: `S`, `M`, `XXL`, `Unknown`
pub type SizeLabel = String;
/// Business-flag label; `Unknown` when the source value was null.
/// Examples: `True`, `False`, `Unknown`
pub type B2bFlag = String;
/// Promotion identifier list; `No Promotion` when the source value was null.
/// Example: `IN Core Free Shipping 2015/04/08 1-0`
pub type PromotionTag = String;
/// Name under which a result is persisted by a sink.
/// Examples: `monthly_revenue`, `average_order_value`
pub type MetricName = String;
/// Column name inside a persisted result table.
/// Examples: `state_revenue`, `market_share_pct`
pub type ColumnName = String;
