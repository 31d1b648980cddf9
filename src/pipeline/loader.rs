//! Order-history dataset loading and normalization.
//!
//! Reads the preprocessed CSV export, normalizes numeric columns that carry
//! thousands separators, re-types the order timestamp to a day-granularity
//! Date column, and derives the month/hour/weekday/margin columns that every
//! downstream stage consumes as-is.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;

use super::error::AnalyticsError;
use super::schema;

const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

const UNIX_EPOCH_DATE: NaiveDate = NaiveDateTime::UNIX_EPOCH.date();

/// A loaded and normalized order-history dataset. The single source of truth
/// for the session; filtered views are independent value copies of it.
#[derive(Debug, Clone)]
pub struct OrderDataset {
    df: DataFrame,
    source: PathBuf,
    dropped_rows: usize,
}

impl OrderDataset {
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Rows discarded at load time because their order timestamp could not be
    /// parsed in any accepted format.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        schema::has_column(&self.df, name)
    }

    /// Earliest and latest order date in the dataset, if any rows exist.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = column_dates(&self.df, schema::ORDER_DATE).ok()?;
        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        for date in dates.into_iter().flatten() {
            span = Some(match span {
                Some((min, max)) => (min.min(date), max.max(date)),
                None => (date, date),
            });
        }
        span
    }

    /// Distinct order channels present in the dataset, sorted.
    pub fn channels(&self) -> Vec<String> {
        let Ok(column) = self.df.column(schema::CHANNEL) else {
            return Vec::new();
        };
        column
            .as_materialized_series()
            .unique()
            .ok()
            .map(|series| {
                let mut channels: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if matches!(val, AnyValue::Null) {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                channels.sort();
                channels
            })
            .unwrap_or_default()
    }
}

/// Load and normalize an order-history CSV.
pub fn load(path: &Path) -> Result<OrderDataset, AnalyticsError> {
    load_with_schema_length(path, DEFAULT_INFER_SCHEMA_LENGTH)
}

/// Load with an explicit CSV schema-inference window.
pub fn load_with_schema_length(
    path: &Path,
    infer_schema_length: usize,
) -> Result<OrderDataset, AnalyticsError> {
    if !path.exists() {
        return Err(AnalyticsError::DatasetNotFound(path.to_path_buf()));
    }

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(infer_schema_length))
        .finish()?
        .collect()?;

    normalize(df, path)
}

/// Process-lifetime memoization of loaded datasets, keyed by resolved path.
/// Repeated loads of the same file return the same logical dataset without
/// re-reading it; `reset` is the only invalidation.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<OrderDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Result<Arc<OrderDataset>, AnalyticsError> {
        self.load_with_schema_length(path, DEFAULT_INFER_SCHEMA_LENGTH)
    }

    pub fn load_with_schema_length(
        &mut self,
        path: &Path,
        infer_schema_length: usize,
    ) -> Result<Arc<OrderDataset>, AnalyticsError> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if let Some(dataset) = self.entries.get(&key) {
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_with_schema_length(path, infer_schema_length)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(mut df: DataFrame, path: &Path) -> Result<OrderDataset, AnalyticsError> {
    if let Some(column) = schema::missing_required(&df).first() {
        return Err(AnalyticsError::missing_column(column));
    }

    normalize_numeric_columns(&mut df)?;
    let dropped_rows = derive_date_columns(&mut df)?;
    derive_margin(&mut df)?;

    Ok(OrderDataset {
        df,
        source: path.to_path_buf(),
        dropped_rows,
    })
}

/// Strip thousands separators from numeric columns stored as text and convert
/// to f64. Columns already f64 are left untouched, other numeric dtypes are
/// cast once, so normalizing an already clean frame is a no-op.
fn normalize_numeric_columns(df: &mut DataFrame) -> Result<(), AnalyticsError> {
    for name in schema::NUMERIC_COLUMNS {
        if !schema::has_column(df, name) {
            continue;
        }
        let column = df.column(name)?;
        let normalized = match column.dtype() {
            DataType::String => {
                let parsed: Float64Chunked = column
                    .str()?
                    .into_iter()
                    .map(|opt| opt.and_then(parse_separated_number))
                    .collect();
                parsed.with_name((*name).into()).into_series()
            }
            DataType::Float64 => continue,
            _ => column
                .cast(&DataType::Float64)?
                .as_materialized_series()
                .clone(),
        };
        df.with_column(normalized)?;
    }
    Ok(())
}

fn parse_separated_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Re-type the order timestamp to a Date column and derive month, hour and
/// weekday. Rows whose timestamp cannot be parsed are dropped; the count is
/// surfaced on the dataset.
fn derive_date_columns(df: &mut DataFrame) -> Result<usize, AnalyticsError> {
    if df.column(schema::ORDER_DATE)?.dtype() == &DataType::Date {
        // Already day-typed (a re-normalized frame); derive from the days.
        return derive_from_date_column(df);
    }

    let raw = df.column(schema::ORDER_DATE)?.str()?.clone();
    let height = df.height();
    let mut days: Vec<Option<i32>> = Vec::with_capacity(height);
    let mut months: Vec<Option<String>> = Vec::with_capacity(height);
    let mut hours: Vec<Option<i32>> = Vec::with_capacity(height);
    let mut weekdays: Vec<Option<String>> = Vec::with_capacity(height);
    let mut keep: Vec<bool> = Vec::with_capacity(height);

    for opt in raw.into_iter() {
        match opt.and_then(parse_order_timestamp) {
            Some(ts) => {
                let date = ts.date();
                days.push(Some((date - UNIX_EPOCH_DATE).num_days() as i32));
                months.push(Some(month_label(date)));
                hours.push(Some(ts.hour() as i32));
                weekdays.push(Some(date.format("%A").to_string()));
                keep.push(true);
            }
            None => {
                days.push(None);
                months.push(None);
                hours.push(None);
                weekdays.push(None);
                keep.push(false);
            }
        }
    }

    let date_ca: Int32Chunked = days.into_iter().collect();
    df.with_column(
        date_ca
            .with_name(schema::ORDER_DATE.into())
            .into_date()
            .into_series(),
    )?;
    let month_ca: StringChunked = months.into_iter().collect();
    df.with_column(month_ca.with_name(schema::ORDER_MONTH.into()).into_series())?;
    let hour_ca: Int32Chunked = hours.into_iter().collect();
    df.with_column(hour_ca.with_name(schema::ORDER_HOUR.into()).into_series())?;
    let weekday_ca: StringChunked = weekdays.into_iter().collect();
    df.with_column(
        weekday_ca
            .with_name(schema::ORDER_WEEKDAY.into())
            .into_series(),
    )?;

    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        *df = df.filter(&mask)?;
    }
    Ok(dropped)
}

fn derive_from_date_column(df: &mut DataFrame) -> Result<usize, AnalyticsError> {
    let dates = column_dates(df, schema::ORDER_DATE)?;
    let months: StringChunked = dates.iter().map(|opt| opt.map(month_label)).collect();
    df.with_column(months.with_name(schema::ORDER_MONTH.into()).into_series())?;
    // Time-of-day is gone once the column is day-typed.
    let hours: Int32Chunked = dates.iter().map(|opt| opt.map(|_| 0i32)).collect();
    df.with_column(hours.with_name(schema::ORDER_HOUR.into()).into_series())?;
    let weekdays: StringChunked = dates
        .iter()
        .map(|opt| opt.map(|d| d.format("%A").to_string()))
        .collect();
    df.with_column(
        weekdays
            .with_name(schema::ORDER_WEEKDAY.into())
            .into_series(),
    )?;

    let keep: Vec<bool> = dates.iter().map(|opt| opt.is_some()).collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        *df = df.filter(&mask)?;
    }
    Ok(dropped)
}

fn parse_order_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Margin = (unit price - supply price) * quantity. Requires both price
/// columns; when either is absent the column is omitted entirely and
/// consumers treat the missing capability as "no margin data", not zero.
fn derive_margin(df: &mut DataFrame) -> Result<(), AnalyticsError> {
    if !schema::has_column(df, schema::UNIT_PRICE) || !schema::has_column(df, schema::SUPPLY_PRICE)
    {
        return Ok(());
    }
    let quantity = if schema::has_column(df, schema::QUANTITY) {
        col(schema::QUANTITY)
    } else {
        lit(1.0)
    };
    *df = df
        .clone()
        .lazy()
        .with_column(
            ((col(schema::UNIT_PRICE) - col(schema::SUPPLY_PRICE)) * quantity)
                .cast(DataType::Float64)
                .alias(schema::MARGIN),
        )
        .collect()?;
    Ok(())
}

/// Read a Date column as chrono dates via its physical day offsets.
pub(crate) fn column_dates(
    df: &DataFrame,
    name: &str,
) -> Result<Vec<Option<NaiveDate>>, AnalyticsError> {
    let physical = df.column(name)?.cast(&DataType::Int32)?;
    let ca = physical.i32()?;
    Ok(ca
        .into_iter()
        .map(|opt| opt.map(|days| UNIX_EPOCH_DATE + chrono::Duration::days(days as i64)))
        .collect())
}

/// Read a string column as owned values, nulls preserved.
pub(crate) fn column_strings(
    df: &DataFrame,
    name: &str,
) -> Result<Vec<Option<String>>, AnalyticsError> {
    let ca = df.column(name)?.str()?.clone();
    Ok(ca.into_iter().map(|opt| opt.map(str::to_string)).collect())
}

/// Read a numeric column as f64, nulls treated as zero.
pub(crate) fn column_f64s(df: &DataFrame, name: &str) -> Result<Vec<f64>, AnalyticsError> {
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    Ok(ca.into_iter().map(|opt| opt.unwrap_or(0.0)).collect())
}
