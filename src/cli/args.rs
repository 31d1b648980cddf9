//! Command-line argument definitions using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::pipeline::{FilterCriteria, DEFAULT_VIP_LIMIT};

/// Farmsight - Sales analytics dashboard for farm e-commerce order history
#[derive(Parser, Debug)]
#[command(name = "farmsight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input order-history file path (CSV)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start of the analysis date range (YYYY-MM-DD).
    /// Applied only when --to is also given; an inverted range is ignored.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End of the analysis date range (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Order channels to include (comma-separated). Default: all channels.
    #[arg(short, long, value_delimiter = ',')]
    pub channel: Vec<String>,

    /// Restrict the view to event-flagged orders
    #[arg(long, default_value = "false")]
    pub event_only: bool,

    /// Case-insensitive keyword matched against product, option, address,
    /// channel, and purpose fields
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Which analytical view to render
    #[arg(long, value_enum, default_value = "all")]
    pub view: View,

    /// Number of rows in the VIP customer and top-seller rankings
    #[arg(long, default_value_t = DEFAULT_VIP_LIMIT)]
    pub top: usize,

    /// Write the computed dashboard to this path as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Number of rows to use for CSV schema inference.
    /// Use 0 for a full table scan (slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

/// Analytical views of the dashboard.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Render every view
    All,
    /// KPIs, daily sales, and channel performance
    Overview,
    /// Product ranking and regional summary
    DeepDive,
    /// VIP customer ranking
    Customers,
    /// Seller overview, inflow/outflow, and weekly trend
    Sellers,
}

impl Cli {
    /// Filter criteria assembled from the parsed flags.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            from: self.from,
            to: self.to,
            channels: self.channel.clone(),
            event_only: self.event_only,
            keyword: self.keyword.clone(),
        }
    }
}
