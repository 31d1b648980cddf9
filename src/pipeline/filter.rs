//! Filter criteria and the filtered-view pipeline.
//!
//! Criteria are an explicit value object handed in by the caller; no ambient
//! state is read. Each application produces a fresh read-only view, so the
//! final result is the pure intersection of the predicates regardless of the
//! order they run in. The pipeline still evaluates cheapest-first: date
//! range, channel set, event flag, then keyword.

use std::collections::HashSet;

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

use super::error::AnalyticsError;
use super::loader::{column_dates, OrderDataset};
use super::schema;

/// Operator-chosen filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    /// Inclusive start of the order-date range.
    pub from: Option<NaiveDate>,
    /// Inclusive end of the order-date range.
    pub to: Option<NaiveDate>,
    /// Channels to keep; an empty set disables the channel filter.
    pub channels: Vec<String>,
    /// Keep only rows flagged as event orders.
    pub event_only: bool,
    /// Case-insensitive substring searched across the text columns.
    pub keyword: Option<String>,
}

impl FilterCriteria {
    /// Effective inclusive date bounds. A half-open or inverted range
    /// disables the date filter rather than failing.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.from, self.to) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    /// Trimmed keyword, if one is set and non-blank.
    pub fn search_term(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Copy retaining only the date range. Seller cohort/churn analysis runs
    /// against this scope so a channel or keyword narrowing cannot fabricate
    /// churn out of sellers that merely fell outside the search.
    pub fn date_only(&self) -> Self {
        Self {
            from: self.from,
            to: self.to,
            ..Self::default()
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.date_bounds().is_none() && self.channels.is_empty() && !self.event_only
            && self.search_term().is_none()
    }

    /// Human-readable lines describing the active criteria, for result
    /// messages and empty-result reporting.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some((start, end)) = self.date_bounds() {
            lines.push(format!("date range: {} to {} (inclusive)", start, end));
        }
        if !self.channels.is_empty() {
            lines.push(format!("channels: {}", self.channels.join(", ")));
        }
        if self.event_only {
            lines.push("event orders only".to_string());
        }
        if let Some(term) = self.search_term() {
            lines.push(format!("keyword: '{}'", term));
        }
        if lines.is_empty() {
            lines.push("no filters applied".to_string());
        }
        lines
    }
}

/// A read-only projection of the dataset after applying criteria. Never
/// mutated in place; recreated on every criteria change.
#[derive(Debug, Clone)]
pub struct FilteredView {
    df: DataFrame,
    criteria: FilterCriteria,
    source_rows: usize,
}

impl FilteredView {
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// The criteria that produced this view.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Zero matching rows: a valid state, distinct from a load failure.
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Row count of the dataset the view was filtered from.
    pub fn source_rows(&self) -> usize {
        self.source_rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        schema::has_column(&self.df, name)
    }
}

/// Apply the criteria to the dataset, producing a fresh view.
pub fn apply(
    dataset: &OrderDataset,
    criteria: &FilterCriteria,
) -> Result<FilteredView, AnalyticsError> {
    let mut df = dataset.frame().clone();

    if let Some((start, end)) = criteria.date_bounds() {
        df = filter_date_range(&df, start, end)?;
    }
    if !criteria.channels.is_empty() {
        df = filter_channels(&df, &criteria.channels)?;
    }
    if criteria.event_only && schema::has_column(&df, schema::EVENT_FLAG) {
        df = filter_event_rows(&df)?;
    }
    if let Some(term) = criteria.search_term() {
        df = filter_keyword(&df, term)?;
    }

    Ok(FilteredView {
        df,
        criteria: criteria.clone(),
        source_rows: dataset.height(),
    })
}

/// Keep rows whose order date falls inside the inclusive range, compared at
/// day granularity.
fn filter_date_range(
    df: &DataFrame,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DataFrame, AnalyticsError> {
    let dates = column_dates(df, schema::ORDER_DATE)?;
    let keep: Vec<bool> = dates
        .iter()
        .map(|opt| opt.map_or(false, |date| date >= start && date <= end))
        .collect();
    apply_mask(df, &keep)
}

fn filter_channels(df: &DataFrame, channels: &[String]) -> Result<DataFrame, AnalyticsError> {
    let selected: HashSet<&str> = channels.iter().map(String::as_str).collect();
    let ca = df.column(schema::CHANNEL)?.str()?.clone();
    let keep: Vec<bool> = ca
        .into_iter()
        .map(|opt| opt.map_or(false, |channel| selected.contains(channel)))
        .collect();
    apply_mask(df, &keep)
}

fn filter_event_rows(df: &DataFrame) -> Result<DataFrame, AnalyticsError> {
    let ca = df.column(schema::EVENT_FLAG)?.str()?.clone();
    let keep: Vec<bool> = ca
        .into_iter()
        .map(|opt| opt.map_or(false, |flag| flag.trim() == schema::EVENT_YES))
        .collect();
    apply_mask(df, &keep)
}

/// Per-row keyword predicate: a row matches if any participating text column,
/// case-folded, contains the case-folded keyword as a substring. Only search
/// columns that exist and are string-typed participate.
fn filter_keyword(df: &DataFrame, term: &str) -> Result<DataFrame, AnalyticsError> {
    let needle = term.to_lowercase();
    let mut text_columns: Vec<StringChunked> = Vec::new();
    for name in schema::SEARCH_COLUMNS {
        if let Ok(column) = df.column(name) {
            if let Ok(ca) = column.str() {
                text_columns.push(ca.clone());
            }
        }
    }

    let keep: Vec<bool> = (0..df.height())
        .map(|i| {
            text_columns.iter().any(|ca| {
                ca.get(i)
                    .map_or(false, |value| value.to_lowercase().contains(&needle))
            })
        })
        .collect();
    apply_mask(df, &keep)
}

fn apply_mask(df: &DataFrame, keep: &[bool]) -> Result<DataFrame, AnalyticsError> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_range_disables_date_filter() {
        let criteria = FilterCriteria {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.date_bounds(), None);
    }

    #[test]
    fn inverted_range_disables_date_filter() {
        let criteria = FilterCriteria {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.date_bounds(), None);
    }

    #[test]
    fn blank_keyword_is_no_search_term() {
        let criteria = FilterCriteria {
            keyword: Some("   ".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.search_term(), None);
    }

    #[test]
    fn date_only_drops_everything_but_the_range() {
        let criteria = FilterCriteria {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: NaiveDate::from_ymd_opt(2024, 2, 1),
            channels: vec!["KakaoTalk".to_string()],
            event_only: true,
            keyword: Some("gift".to_string()),
        };
        let scoped = criteria.date_only();
        assert_eq!(scoped.from, criteria.from);
        assert_eq!(scoped.to, criteria.to);
        assert!(scoped.channels.is_empty());
        assert!(!scoped.event_only);
        assert_eq!(scoped.keyword, None);
    }
}
