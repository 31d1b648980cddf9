//! Error taxonomy for the analytics pipeline

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Terminal pipeline failures. An empty filtered view is deliberately *not*
/// represented here: zero matching rows is a valid, recoverable state that
/// callers inspect via `FilteredView::is_empty`, distinct from a load failure.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("dataset file not found: {0}")]
    DatasetNotFound(PathBuf),

    #[error("failed to read dataset: {0}")]
    Csv(#[from] PolarsError),

    #[error("required column '{column}' is missing from the dataset")]
    MissingColumn { column: String },
}

impl AnalyticsError {
    pub fn missing_column(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }
}
