//! JSON export of the computed dashboard.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::{
    ChannelPerformance, DailySales, FilterCriteria, Kpis, ProductRank, RegionStat, SellerFlow,
    SellerOverview, SellerTrendPoint, VipCustomer,
};

/// Everything a dashboard run computed, in one serializable document.
///
/// Optional-column sections export as `null` when the source dataset lacks
/// the backing column, mirroring the terminal's "unavailable" note.
#[derive(Debug, Serialize)]
pub struct DashboardExport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub criteria: FilterCriteria,
    pub rows: usize,
    pub kpis: Kpis,
    pub daily_sales: Vec<DailySales>,
    pub product_ranking: Vec<ProductRank>,
    pub channel_performance: Vec<ChannelPerformance>,
    pub region_summary: Option<Vec<RegionStat>>,
    pub vip_customers: Vec<VipCustomer>,
    pub seller_overview: Option<SellerOverview>,
    pub seller_flow: Option<Vec<SellerFlow>>,
    pub seller_trend: Option<Vec<SellerTrendPoint>>,
}

/// Write the export as pretty-printed JSON.
pub fn write_json(export: &DashboardExport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create export file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, export)
        .with_context(|| format!("failed to write JSON export: {}", path.display()))?;
    Ok(())
}
