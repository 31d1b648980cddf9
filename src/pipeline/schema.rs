//! Column schema for the preprocessed order-history export.
//!
//! Column names are domain-specific strings matched exactly. Components query
//! optional-column presence here instead of branching on membership ad hoc;
//! an absent optional column degrades the views that need it to an
//! "unavailable" result rather than a zero-filled substitute.

use polars::prelude::DataFrame;

// Required columns - the loader rejects a dataset without these.
pub const ORDER_DATE: &str = "order_date";
pub const CHANNEL: &str = "channel";
pub const PAID_AMOUNT: &str = "paid_amount";
pub const UID: &str = "uid";
pub const PRODUCT: &str = "product";

// Optional columns - presence-dependent behavior.
pub const QUANTITY: &str = "quantity";
pub const UNIT_PRICE: &str = "unit_price";
pub const SUPPLY_PRICE: &str = "supply_price";
pub const PAYMENT_AMOUNT: &str = "payment_amount";
pub const CANCEL_AMOUNT: &str = "cancel_amount";
pub const EVENT_FLAG: &str = "event_flag";
pub const REGION: &str = "region";
pub const SELLER: &str = "seller";
pub const ADDRESS: &str = "address";
pub const PURPOSE: &str = "purpose";
pub const OPTION_CODE: &str = "option_code";
pub const SELECTED_OPTION: &str = "selected_option";

// Derived columns - computed once at load time, never recomputed downstream.
pub const ORDER_MONTH: &str = "order_month";
pub const ORDER_HOUR: &str = "order_hour";
pub const ORDER_WEEKDAY: &str = "order_weekday";
pub const MARGIN: &str = "margin";

/// Sentinel marking an event order in `event_flag`.
pub const EVENT_YES: &str = "Y";

pub const REQUIRED_COLUMNS: &[&str] = &[ORDER_DATE, CHANNEL, PAID_AMOUNT, UID, PRODUCT];

/// Columns that may arrive as text with thousands separators and must be
/// normalized to f64 before any arithmetic.
pub const NUMERIC_COLUMNS: &[&str] = &[
    PAYMENT_AMOUNT,
    UNIT_PRICE,
    SUPPLY_PRICE,
    CANCEL_AMOUNT,
    PAID_AMOUNT,
    QUANTITY,
];

/// Text-bearing columns participating in the keyword OR-search. Only the
/// subset present in the dataset is searched; numeric and date columns never
/// participate.
pub const SEARCH_COLUMNS: &[&str] = &[
    PRODUCT,
    OPTION_CODE,
    ADDRESS,
    CHANNEL,
    PURPOSE,
    SELECTED_OPTION,
];

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Required columns absent from the frame, in schema order.
pub fn missing_required(df: &DataFrame) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !has_column(df, name))
        .collect()
}
