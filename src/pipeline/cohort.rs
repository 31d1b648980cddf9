//! Seller cohort and churn analysis.
//!
//! Sellers are grouped by the month of their first observed order; churn is
//! the set difference of consecutive monthly activity sets. Activity records
//! are recomputed from the supplied view on every call, never cached across
//! filter changes.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::aggregate::Availability;
use super::error::AnalyticsError;
use super::filter::FilteredView;
use super::loader::column_strings;
use super::schema;

/// One period of the seller inflow/outflow series. `churned` carries a
/// negative sign so a diverging bar chart plots it below the axis; that sign
/// convention is part of the contract, not an accounting artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerFlow {
    /// Month period, `YYYY-MM`.
    pub period: String,
    pub new_sellers: i64,
    pub churned: i64,
}

/// Monthly new-seller and churned-seller series, merged by period.
///
/// New sellers in a period are those whose first order in the view falls in
/// it. Churned sellers in period C are those active in the immediately
/// preceding period but not in C; the first period has no predecessor and so
/// carries zero churn. Fewer than two distinct months yields no churn
/// contributions; a view without sellers yields an empty series.
pub fn monthly_seller_flow(
    view: &FilteredView,
) -> Result<Availability<Vec<SellerFlow>>, AnalyticsError> {
    if !view.has_column(schema::SELLER) {
        return Ok(Availability::Unavailable {
            column: schema::SELLER,
        });
    }
    let df = view.frame();
    let sellers = column_strings(df, schema::SELLER)?;
    let months = column_strings(df, schema::ORDER_MONTH)?;

    // Active-seller set per month and each seller's first-order month.
    // "YYYY-MM" keys sort chronologically.
    let mut active: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut first_seen: BTreeMap<String, String> = BTreeMap::new();
    for (seller, month) in sellers.into_iter().zip(months) {
        let (Some(seller), Some(month)) = (seller, month) else {
            continue;
        };
        active
            .entry(month.clone())
            .or_default()
            .insert(seller.clone());
        first_seen
            .entry(seller)
            .and_modify(|first| {
                if month < *first {
                    *first = month.clone();
                }
            })
            .or_insert(month);
    }

    if active.is_empty() {
        return Ok(Availability::Ready(Vec::new()));
    }

    let mut new_by_period: BTreeMap<&str, i64> = BTreeMap::new();
    for first in first_seen.values() {
        *new_by_period.entry(first.as_str()).or_insert(0) += 1;
    }

    let periods: Vec<&String> = active.keys().collect();
    let mut churn_by_period: BTreeMap<&str, i64> = BTreeMap::new();
    for pair in periods.windows(2) {
        let previous = &active[pair[0]];
        let current = &active[pair[1]];
        let churned = previous.difference(current).count() as i64;
        churn_by_period.insert(pair[1].as_str(), -churned);
    }

    // Outer merge on period; a period missing from one series defaults to 0.
    let mut all_periods: BTreeSet<&str> = new_by_period.keys().copied().collect();
    all_periods.extend(churn_by_period.keys().copied());

    let series = all_periods
        .into_iter()
        .map(|period| SellerFlow {
            period: period.to_string(),
            new_sellers: new_by_period.get(period).copied().unwrap_or(0),
            churned: churn_by_period.get(period).copied().unwrap_or(0),
        })
        .collect();
    Ok(Availability::Ready(series))
}
