/// Constants describing the raw source schema.
pub mod source {
    /// Order identifier column as exported by the sales store.
    pub const COL_ORDER_ID: &str = "Order ID";
    /// Order date column (`MM-dd-yy` strings).
    pub const COL_DATE: &str = "Date";
    /// Order status column.
    pub const COL_STATUS: &str = "Status";
    /// Ordered quantity column.
    pub const COL_QTY: &str = "Qty";
    /// Order amount column.
    pub const COL_AMOUNT: &str = "Amount";
    /// Shipping state column.
    pub const COL_SHIP_STATE: &str = "ship-state";
    /// Product category column.
    pub const COL_CATEGORY: &str = "Category";
    /// Product size column.
    pub const COL_SIZE: &str = "Size";
    /// Business-to-business flag column.
    pub const COL_B2B: &str = "B2B";
    /// Promotion identifier column.
    pub const COL_PROMOTION_IDS: &str = "promotion-ids";

    /// All raw columns the pipeline projects, in canonical order.
    pub const PROJECTED_COLUMNS: [&str; 10] = [
        COL_ORDER_ID,
        COL_DATE,
        COL_STATUS,
        COL_QTY,
        COL_AMOUNT,
        COL_SHIP_STATE,
        COL_CATEGORY,
        COL_SIZE,
        COL_B2B,
        COL_PROMOTION_IDS,
    ];
}

/// Constants used by normalization and filter predicates.
pub mod fields {
    /// Date format accepted for `order_date` values.
    pub const DATE_FORMAT: &str = "%m-%d-%y";
    /// Default substituted for a null promotion identifier.
    pub const DEFAULT_PROMOTION: &str = "No Promotion";
    /// Default substituted for a null business flag.
    pub const DEFAULT_B2B: &str = "Unknown";
    /// Default substituted for a null size label.
    pub const DEFAULT_SIZE: &str = "Unknown";
    /// Status value identifying cancelled orders.
    pub const STATUS_CANCELLED: &str = "Cancelled";
    /// Derived promotion-impact label for orders that used a promotion.
    pub const PROMOTION_USED: &str = "Promotion Used";
}

/// Output names and column names for persisted results.
pub mod outputs {
    /// Revenue grouped by order year and month.
    pub const MONTHLY_REVENUE: &str = "monthly_revenue";
    /// Revenue grouped by shipping state.
    pub const REGION_SALES: &str = "region_sales";
    /// Revenue grouped by promotion usage.
    pub const PROMOTION_IMPACT: &str = "promotion_impact";
    /// Revenue and percentage-of-total grouped by category.
    pub const CATEGORY_CONTRIBUTION: &str = "category_contribution";
    /// Revenue and market share grouped by business flag.
    pub const B2B_PERFORMANCE: &str = "b2b_performance";
    /// Revenue grouped by size, descending.
    pub const SIZE_REVENUE: &str = "size_revenue";
    /// Size revenue with market-share percentage appended.
    pub const SIZE_MARKET_SHARE: &str = "size_market_share";
    /// Scalar: average order value.
    pub const AVERAGE_ORDER_VALUE: &str = "average_order_value";
    /// Scalar: cancellation rate percentage.
    pub const CANCELLATION_RATE: &str = "cancellation_rate";
    /// Scalar: average basket size.
    pub const AVERAGE_BASKET_SIZE: &str = "average_basket_size";

    /// Grouped-table output names in canonical publish order.
    pub const TABLES: [&str; 7] = [
        MONTHLY_REVENUE,
        REGION_SALES,
        PROMOTION_IMPACT,
        CATEGORY_CONTRIBUTION,
        B2B_PERFORMANCE,
        SIZE_REVENUE,
        SIZE_MARKET_SHARE,
    ];

    /// Column names of the published result schema.
    pub mod columns {
        /// Calendar year extracted from `order_date`.
        pub const YEAR: &str = "year";
        /// Calendar month extracted from `order_date`.
        pub const MONTH: &str = "month";
        /// Summed amount per year/month group.
        pub const MONTHLY_REVENUE: &str = "monthly_revenue";
        /// Shipping-state group key.
        pub const STATE: &str = "state";
        /// Summed amount per state group.
        pub const STATE_REVENUE: &str = "state_revenue";
        /// Derived promotion-usage group key.
        pub const HAS_PROMOTION: &str = "has_promotion";
        /// Summed amount per group.
        pub const REVENUE: &str = "revenue";
        /// Category group key.
        pub const CATEGORY: &str = "category";
        /// Summed amount per category group.
        pub const CATEGORY_REVENUE: &str = "category_revenue";
        /// Category revenue as a rounded percentage of total revenue.
        pub const CATEGORY_PERCENTAGE: &str = "category_percentage";
        /// Business-flag group key.
        pub const IS_B2B: &str = "is_b2b";
        /// Group revenue as a rounded percentage of total revenue.
        pub const MARKET_SHARE_PCT: &str = "market_share_pct";
        /// Size group key.
        pub const SIZE: &str = "size";
        /// Summed amount per size group.
        pub const SIZE_REVENUE: &str = "size_revenue";
    }
}

/// Constants used by the parquet result sink.
pub mod sink {
    /// Extension for persisted result files.
    pub const RESULT_EXTENSION: &str = "parquet";
    /// Extension suffix for staged writes before the atomic rename.
    pub const STAGING_EXTENSION: &str = "part";
}
