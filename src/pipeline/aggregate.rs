//! KPI and grouped-summary computation over a filtered view.
//!
//! Every aggregate tolerates a zero-row view (empty table, zeroed scalars)
//! and signals a missing optional column as `Availability::Unavailable`
//! instead of substituting zeros, so one degraded view never aborts its
//! siblings.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::Serialize;

use super::error::AnalyticsError;
use super::filter::FilteredView;
use super::loader::{column_dates, column_f64s, column_strings};
use super::schema;

/// Default size of the VIP customer ranking.
pub const DEFAULT_VIP_LIMIT: usize = 20;

/// Result of an aggregate that depends on an optional column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability<T> {
    Ready(T),
    /// The named column is absent from the dataset; the view is skipped, not
    /// rendered as zeros.
    Unavailable { column: &'static str },
}

impl<T> Availability<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Availability::Ready(value) => Some(value),
            Availability::Unavailable { .. } => None,
        }
    }
}

/// Summary scalars for the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_orders: usize,
    pub avg_order_value: f64,
    /// Mean of the margin column; `None` when margin data is unavailable.
    pub avg_margin: Option<f64>,
}

pub fn compute_kpis(view: &FilteredView) -> Result<Kpis, AnalyticsError> {
    let df = view.frame();
    let total_orders = df.height();
    let total_sales = column_sum(df, schema::PAID_AMOUNT)?;
    let avg_order_value = if total_orders > 0 {
        total_sales / total_orders as f64
    } else {
        0.0
    };
    let avg_margin = if view.has_column(schema::MARGIN) && total_orders > 0 {
        column_mean(df, schema::MARGIN)?
    } else {
        None
    };
    Ok(Kpis {
        total_sales,
        total_orders,
        avg_order_value,
        avg_margin,
    })
}

/// One row of the product sales ranking, revenue-descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRank {
    pub product: String,
    pub total_quantity: f64,
    pub total_revenue: f64,
    /// Share of the filtered view's total revenue, in percent.
    pub share_pct: f64,
}

pub fn product_ranking(view: &FilteredView) -> Result<Vec<ProductRank>, AnalyticsError> {
    let df = view.frame();
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let quantity_expr = if view.has_column(schema::QUANTITY) {
        col(schema::QUANTITY).sum().alias("total_quantity")
    } else {
        // One unit per line when the export lacks a quantity column.
        col(schema::PAID_AMOUNT).count().alias("total_quantity")
    };
    let grouped = df
        .clone()
        .lazy()
        .group_by_stable([col(schema::PRODUCT)])
        .agg([
            quantity_expr,
            col(schema::PAID_AMOUNT).sum().alias("total_revenue"),
        ])
        .collect()?;

    let total_sales = column_sum(df, schema::PAID_AMOUNT)?;
    let products = group_labels(&grouped, schema::PRODUCT)?;
    let quantities = column_f64s(&grouped, "total_quantity")?;
    let revenues = column_f64s(&grouped, "total_revenue")?;

    let mut rows: Vec<ProductRank> = products
        .into_iter()
        .zip(quantities)
        .zip(revenues)
        .map(|((product, total_quantity), total_revenue)| ProductRank {
            product,
            total_quantity,
            total_revenue,
            share_pct: if total_sales > 0.0 {
                total_revenue / total_sales * 100.0
            } else {
                0.0
            },
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_revenue
            .partial_cmp(&a.total_revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(rows)
}

/// Revenue per order date, chronological.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub revenue: f64,
}

pub fn daily_sales(view: &FilteredView) -> Result<Vec<DailySales>, AnalyticsError> {
    let df = view.frame();
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    let dates = column_dates(df, schema::ORDER_DATE)?;
    let paid = column_f64s(df, schema::PAID_AMOUNT)?;
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, amount) in dates.into_iter().zip(paid) {
        if let Some(date) = date {
            *by_day.entry(date).or_insert(0.0) += amount;
        }
    }
    Ok(by_day
        .into_iter()
        .map(|(date, revenue)| DailySales { date, revenue })
        .collect())
}

/// Revenue (and margin when available) per order channel, revenue-descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPerformance {
    pub channel: String,
    pub revenue: f64,
    pub margin: Option<f64>,
}

pub fn channel_performance(view: &FilteredView) -> Result<Vec<ChannelPerformance>, AnalyticsError> {
    let df = view.frame();
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let has_margin = view.has_column(schema::MARGIN);
    let mut aggs = vec![col(schema::PAID_AMOUNT).sum().alias("revenue")];
    if has_margin {
        aggs.push(col(schema::MARGIN).sum().alias("margin"));
    }
    let grouped = df
        .clone()
        .lazy()
        .group_by_stable([col(schema::CHANNEL)])
        .agg(aggs)
        .collect()?;

    let channels = group_labels(&grouped, schema::CHANNEL)?;
    let revenues = column_f64s(&grouped, "revenue")?;
    let margins = if has_margin {
        column_f64s(&grouped, "margin")?.into_iter().map(Some).collect()
    } else {
        vec![None; channels.len()]
    };

    let mut rows: Vec<ChannelPerformance> = channels
        .into_iter()
        .zip(revenues)
        .zip(margins)
        .map(|((channel, revenue), margin)| ChannelPerformance {
            channel,
            revenue,
            margin,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(rows)
}

/// Order count and revenue per region, revenue-descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStat {
    pub region: String,
    pub order_count: u64,
    pub revenue: f64,
}

pub fn region_summary(
    view: &FilteredView,
) -> Result<Availability<Vec<RegionStat>>, AnalyticsError> {
    if !view.has_column(schema::REGION) {
        return Ok(Availability::Unavailable {
            column: schema::REGION,
        });
    }
    let df = view.frame();
    if df.height() == 0 {
        return Ok(Availability::Ready(Vec::new()));
    }

    let grouped = df
        .clone()
        .lazy()
        .group_by_stable([col(schema::REGION)])
        .agg([
            col(schema::UID).count().alias("order_count"),
            col(schema::PAID_AMOUNT).sum().alias("revenue"),
        ])
        .collect()?;

    let regions = group_labels(&grouped, schema::REGION)?;
    let counts = column_f64s(&grouped, "order_count")?;
    let revenues = column_f64s(&grouped, "revenue")?;

    let mut rows: Vec<RegionStat> = regions
        .into_iter()
        .zip(counts)
        .zip(revenues)
        .map(|((region, count), revenue)| RegionStat {
            region,
            order_count: count as u64,
            revenue,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(Availability::Ready(rows))
}

/// One row of the VIP ranking: a customer with their order count and spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VipCustomer {
    pub uid: String,
    pub order_count: u64,
    pub total_paid: f64,
}

/// Top customers by order count. Ties keep first-appearance order (the sort
/// is stable over the stable group order), capped at `limit`.
pub fn vip_customers(
    view: &FilteredView,
    limit: usize,
) -> Result<Vec<VipCustomer>, AnalyticsError> {
    let df = view.frame();
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let grouped = df
        .clone()
        .lazy()
        .group_by_stable([col(schema::UID)])
        .agg([
            col(schema::UID).count().alias("order_count"),
            col(schema::PAID_AMOUNT).sum().alias("total_paid"),
        ])
        .collect()?;

    let uids = group_labels(&grouped, schema::UID)?;
    let counts = column_f64s(&grouped, "order_count")?;
    let paid = column_f64s(&grouped, "total_paid")?;

    let mut rows: Vec<VipCustomer> = uids
        .into_iter()
        .zip(counts)
        .zip(paid)
        .map(|((uid, count), total_paid)| VipCustomer {
            uid,
            order_count: count as u64,
            total_paid,
        })
        .collect();
    rows.sort_by(|a, b| b.order_count.cmp(&a.order_count));
    rows.truncate(limit);
    Ok(rows)
}

/// Headline seller metrics for the seller analysis view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerOverview {
    pub total_sellers: usize,
    pub latest_month: Option<String>,
    pub active_in_latest: usize,
}

pub fn seller_overview(
    view: &FilteredView,
) -> Result<Availability<SellerOverview>, AnalyticsError> {
    if !view.has_column(schema::SELLER) {
        return Ok(Availability::Unavailable {
            column: schema::SELLER,
        });
    }
    let df = view.frame();
    let sellers = column_strings(df, schema::SELLER)?;
    let months = column_strings(df, schema::ORDER_MONTH)?;

    let mut all: HashSet<&str> = HashSet::new();
    let mut latest_month: Option<&str> = None;
    for (seller, month) in sellers.iter().zip(months.iter()) {
        if let (Some(seller), Some(month)) = (seller.as_deref(), month.as_deref()) {
            all.insert(seller);
            if latest_month.map_or(true, |latest| month > latest) {
                latest_month = Some(month);
            }
        }
    }
    let active_in_latest = match latest_month {
        Some(latest) => {
            let active: HashSet<&str> = sellers
                .iter()
                .zip(months.iter())
                .filter(|(_, month)| month.as_deref() == Some(latest))
                .filter_map(|(seller, _)| seller.as_deref())
                .collect();
            active.len()
        }
        None => 0,
    };

    Ok(Availability::Ready(SellerOverview {
        total_sellers: all.len(),
        latest_month: latest_month.map(str::to_string),
        active_in_latest,
    }))
}

/// Names of the `limit` sellers with the highest revenue in the view.
pub fn top_sellers(
    view: &FilteredView,
    limit: usize,
) -> Result<Availability<Vec<String>>, AnalyticsError> {
    if !view.has_column(schema::SELLER) {
        return Ok(Availability::Unavailable {
            column: schema::SELLER,
        });
    }
    let df = view.frame();
    let sellers = column_strings(df, schema::SELLER)?;
    let paid = column_f64s(df, schema::PAID_AMOUNT)?;

    let mut revenue: HashMap<String, f64> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for (seller, amount) in sellers.into_iter().zip(paid) {
        if let Some(seller) = seller {
            if !revenue.contains_key(&seller) {
                order.push(seller.clone());
            }
            *revenue.entry(seller).or_insert(0.0) += amount;
        }
    }
    order.sort_by(|a, b| {
        revenue[b]
            .partial_cmp(&revenue[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(limit);
    Ok(Availability::Ready(order))
}

/// Revenue per ISO week for one seller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerTrendPoint {
    pub week: String,
    pub seller: String,
    pub revenue: f64,
}

/// Weekly revenue series for the selected sellers, week-major ordering.
pub fn seller_weekly_revenue(
    view: &FilteredView,
    selected: &[String],
) -> Result<Availability<Vec<SellerTrendPoint>>, AnalyticsError> {
    if !view.has_column(schema::SELLER) {
        return Ok(Availability::Unavailable {
            column: schema::SELLER,
        });
    }
    let df = view.frame();
    let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let sellers = column_strings(df, schema::SELLER)?;
    let dates = column_dates(df, schema::ORDER_DATE)?;
    let paid = column_f64s(df, schema::PAID_AMOUNT)?;

    let mut by_week: BTreeMap<(String, String), f64> = BTreeMap::new();
    for ((seller, date), amount) in sellers.into_iter().zip(dates).zip(paid) {
        let (Some(seller), Some(date)) = (seller, date) else {
            continue;
        };
        if !wanted.contains(seller.as_str()) {
            continue;
        }
        let iso = date.iso_week();
        let week = format!("{}-W{:02}", iso.year(), iso.week());
        *by_week.entry((week, seller)).or_insert(0.0) += amount;
    }

    Ok(Availability::Ready(
        by_week
            .into_iter()
            .map(|((week, seller), revenue)| SellerTrendPoint {
                week,
                seller,
                revenue,
            })
            .collect(),
    ))
}

fn column_sum(df: &DataFrame, name: &str) -> Result<f64, AnalyticsError> {
    if df.height() == 0 {
        return Ok(0.0);
    }
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    Ok(cast.f64()?.sum().unwrap_or(0.0))
}

fn column_mean(df: &DataFrame, name: &str) -> Result<Option<f64>, AnalyticsError> {
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    Ok(cast.f64()?.mean())
}

/// Group-key labels of an aggregated frame, in group order.
fn group_labels(df: &DataFrame, name: &str) -> Result<Vec<String>, AnalyticsError> {
    let series = df.column(name)?.as_materialized_series().clone();
    let mut labels = Vec::with_capacity(series.len());
    for i in 0..series.len() {
        let value = series.get(i)?;
        labels.push(value.to_string().trim_matches('"').to_string());
    }
    Ok(labels)
}
