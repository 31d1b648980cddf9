//! Farmsight: Sales Analytics Dashboard CLI
//!
//! Loads an order-history CSV, applies the operator's filter criteria, and
//! renders sales, customer, and seller analytics in the terminal.

mod cli;
mod pipeline;
mod report;
mod secrets;
mod utils;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, View};
use pipeline::{aggregate, cohort, filter, DatasetCache};
use report::{DashboardExport, write_json};
use utils::{
    create_spinner, finish_with_success, format_span, print_banner, print_completion,
    print_config, print_count, print_info, print_section, print_step_header, print_step_time,
    print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let criteria = cli.criteria();

    print_banner(env!("CARGO_PKG_VERSION"));

    match secrets::load_api_credentials() {
        Some(_) => print_info("Commerce API credentials found"),
        None => print_info("No commerce API credentials; running in offline mode"),
    }
    println!();

    print_config(&cli.input, &criteria, cli.top);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading order history...");
    let mut cache = DatasetCache::new();
    let dataset = match cache.load_with_schema_length(&cli.input, cli.infer_schema_length) {
        Ok(dataset) => dataset,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    finish_with_success(&spinner, "Dataset loaded");
    print_count("order rows", dataset.height());
    if dataset.dropped_rows() > 0 {
        print_warning(&format!(
            "{} row(s) dropped for unparseable order dates",
            dataset.dropped_rows()
        ));
    }
    println!("      Date span: {}", format_span(dataset.date_span()));
    print_step_time(step_start.elapsed());

    // Step 2: Apply filters
    print_step_header(2, "Apply Filters");
    let step_start = Instant::now();
    let view = filter::apply(&dataset, &criteria)?;
    print_success("Filters applied");
    print_count("matching rows", view.len());
    if view.is_empty() {
        print_warning("No orders match the current filters:");
        for line in view.criteria().describe() {
            println!("        - {}", line);
        }
        print_info("Relax the filters and run again");
        return Ok(());
    }
    print_step_time(step_start.elapsed());

    // Step 3: Compute and render analytics
    print_step_header(3, "Analytics");
    let step_start = Instant::now();

    let kpis = aggregate::compute_kpis(&view)?;
    print_section("Key Performance Indicators");
    report::render_kpis(&kpis);

    let show = |wanted: View| cli.view == View::All || cli.view == wanted;

    let series = aggregate::daily_sales(&view)?;
    let channels = aggregate::channel_performance(&view)?;
    if show(View::Overview) {
        print_section("Daily Sales");
        report::render_daily_sales(&series);
        print_section("Channel Performance");
        report::render_channel_performance(&channels);
    }

    let ranking = aggregate::product_ranking(&view)?;
    let regions = aggregate::region_summary(&view)?;
    if show(View::DeepDive) {
        print_section("Product Ranking");
        report::render_product_ranking(&ranking);
        print_section("Regional Summary");
        report::render_region_summary(&regions);
    }

    let vips = aggregate::vip_customers(&view, cli.top)?;
    if show(View::Customers) {
        print_section("VIP Customers");
        report::render_vip_customers(&vips);
    }

    // Seller churn runs against the date-scoped view so channel or keyword
    // narrowing cannot fabricate churn.
    let seller_scope = filter::apply(&dataset, &criteria.date_only())?;
    let overview = aggregate::seller_overview(&seller_scope)?;
    let flow = cohort::monthly_seller_flow(&seller_scope)?;
    let trend = match aggregate::top_sellers(&seller_scope, cli.top)? {
        aggregate::Availability::Ready(selected) => {
            aggregate::seller_weekly_revenue(&seller_scope, &selected)?
        }
        aggregate::Availability::Unavailable { column } => {
            aggregate::Availability::Unavailable { column }
        }
    };
    if show(View::Sellers) {
        print_section("Seller Overview");
        report::render_seller_overview(&overview);
        print_section("Seller Inflow / Outflow");
        report::render_seller_flow(&flow);
        print_section("Top Seller Weekly Revenue");
        report::render_seller_trend(&trend);
    }

    print_step_time(step_start.elapsed());

    if let Some(path) = &cli.json {
        print_step_header(4, "Export");
        let export = DashboardExport {
            generated_at: chrono::Utc::now(),
            source: dataset.source().display().to_string(),
            criteria: criteria.clone(),
            rows: view.len(),
            kpis,
            daily_sales: series,
            product_ranking: ranking,
            channel_performance: channels,
            region_summary: regions.ready(),
            vip_customers: vips,
            seller_overview: overview.ready(),
            seller_flow: flow.ready(),
            seller_trend: trend.ready(),
        };
        write_json(&export, path)?;
        print_success(&format!("Dashboard exported to {}", path.display()));
    }

    print_completion();
    Ok(())
}
