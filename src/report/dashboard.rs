//! Terminal rendering of the analytical views.
//!
//! Pure presentation: every function takes computed pipeline data and prints
//! tables or bars; nothing here reaches back into the dataset.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{
    Availability, ChannelPerformance, DailySales, Kpis, ProductRank, RegionStat, SellerFlow,
    SellerOverview, SellerTrendPoint, VipCustomer,
};

const DIVERGING_BAR_MAX: i64 = 30;

/// KPI card: total sales, order count, AOV, average margin.
pub fn render_kpis(kpis: &Kpis) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("💰 Total Sales"),
        Cell::new(format_amount(kpis.total_sales)).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("🧾 Total Orders"),
        Cell::new(group_digits(kpis.total_orders as i64)),
    ]);
    table.add_row(vec![
        Cell::new("📈 Avg Order Value"),
        Cell::new(format_amount(kpis.avg_order_value)),
    ]);
    table.add_row(vec![
        Cell::new("🌱 Avg Margin"),
        match kpis.avg_margin {
            Some(margin) => Cell::new(format_amount(margin)),
            None => Cell::new("unavailable").fg(Color::DarkGrey),
        },
    ]);
    print_table(&table);
}

pub fn render_daily_sales(series: &[DailySales]) {
    if series.is_empty() {
        print_none("no daily sales to show");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Date").add_attribute(Attribute::Bold),
        Cell::new("Revenue").add_attribute(Attribute::Bold),
    ]);
    for point in series {
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            Cell::new(format_amount(point.revenue)),
        ]);
    }
    print_table(&table);
}

pub fn render_product_ranking(rows: &[ProductRank]) {
    if rows.is_empty() {
        print_none("no product sales to rank");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Product").add_attribute(Attribute::Bold),
        Cell::new("Quantity").add_attribute(Attribute::Bold),
        Cell::new("Revenue").add_attribute(Attribute::Bold),
        Cell::new("Share").add_attribute(Attribute::Bold),
    ]);
    for rank in rows {
        table.add_row(vec![
            Cell::new(&rank.product),
            Cell::new(group_digits(rank.total_quantity as i64)),
            Cell::new(format_amount(rank.total_revenue)),
            Cell::new(format!("{:.1}%", rank.share_pct)),
        ]);
    }
    print_table(&table);
}

pub fn render_channel_performance(rows: &[ChannelPerformance]) {
    if rows.is_empty() {
        print_none("no channel activity to show");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Channel").add_attribute(Attribute::Bold),
        Cell::new("Revenue").add_attribute(Attribute::Bold),
        Cell::new("Margin").add_attribute(Attribute::Bold),
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.channel),
            Cell::new(format_amount(row.revenue)),
            match row.margin {
                Some(margin) => Cell::new(format_amount(margin)),
                None => Cell::new("unavailable").fg(Color::DarkGrey),
            },
        ]);
    }
    print_table(&table);
}

pub fn render_region_summary(summary: &Availability<Vec<RegionStat>>) {
    let rows = match summary {
        Availability::Ready(rows) => rows,
        Availability::Unavailable { column } => {
            print_unavailable(column);
            return;
        }
    };
    if rows.is_empty() {
        print_none("no regional activity to show");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Region").add_attribute(Attribute::Bold),
        Cell::new("Orders").add_attribute(Attribute::Bold),
        Cell::new("Revenue").add_attribute(Attribute::Bold),
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.region),
            Cell::new(group_digits(row.order_count as i64)),
            Cell::new(format_amount(row.revenue)),
        ]);
    }
    print_table(&table);
}

pub fn render_vip_customers(rows: &[VipCustomer]) {
    if rows.is_empty() {
        print_none("no customers in the current view");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Customer").add_attribute(Attribute::Bold),
        Cell::new("Orders").add_attribute(Attribute::Bold),
        Cell::new("Total Paid").add_attribute(Attribute::Bold),
    ]);
    for (position, vip) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&vip.uid),
            Cell::new(group_digits(vip.order_count as i64)),
            Cell::new(format_amount(vip.total_paid)),
        ]);
    }
    print_table(&table);
}

pub fn render_seller_overview(overview: &Availability<SellerOverview>) {
    let overview = match overview {
        Availability::Ready(overview) => overview,
        Availability::Unavailable { column } => {
            print_unavailable(column);
            return;
        }
    };
    println!(
        "      Active sellers in period: {}",
        style(overview.total_sellers).yellow().bold()
    );
    match &overview.latest_month {
        Some(month) => println!(
            "      Active in {}: {}",
            month,
            style(overview.active_in_latest).yellow().bold()
        ),
        None => println!("      No seller activity in the current view"),
    }
}

/// Diverging bars: new sellers above the axis in green, churn below in red.
pub fn render_seller_flow(flow: &Availability<Vec<SellerFlow>>) {
    let series = match flow {
        Availability::Ready(series) => series,
        Availability::Unavailable { column } => {
            print_unavailable(column);
            return;
        }
    };
    if series.is_empty() {
        print_none("no seller activity to chart");
        return;
    }

    let peak = series
        .iter()
        .map(|flow| flow.new_sellers.max(flow.churned.abs()))
        .max()
        .unwrap_or(1)
        .max(1);

    for flow in series {
        let inflow = scale_bar(flow.new_sellers, peak);
        let outflow = scale_bar(flow.churned.abs(), peak);
        println!(
            "      {}  {}{} {:+} / {:+}",
            style(&flow.period).bold(),
            style("█".repeat(inflow)).green(),
            style("█".repeat(outflow)).red(),
            flow.new_sellers,
            flow.churned,
        );
    }
    println!(
        "      {}",
        style("new sellers (green, +) vs churned (red, −)").dim()
    );
}

pub fn render_seller_trend(trend: &Availability<Vec<SellerTrendPoint>>) {
    let points = match trend {
        Availability::Ready(points) => points,
        Availability::Unavailable { column } => {
            print_unavailable(column);
            return;
        }
    };
    if points.is_empty() {
        print_none("no weekly revenue to show");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Week").add_attribute(Attribute::Bold),
        Cell::new("Seller").add_attribute(Attribute::Bold),
        Cell::new("Revenue").add_attribute(Attribute::Bold),
    ]);
    for point in points {
        table.add_row(vec![
            Cell::new(&point.week),
            Cell::new(&point.seller),
            Cell::new(format_amount(point.revenue)),
        ]);
    }
    print_table(&table);
}

fn scale_bar(value: i64, peak: i64) -> usize {
    ((value * DIVERGING_BAR_MAX) / peak).clamp(0, DIVERGING_BAR_MAX) as usize
}

fn print_table(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn print_unavailable(column: &str) {
    println!(
        "      {} {}",
        style("—").dim(),
        style(format!(
            "unavailable: dataset has no '{}' column",
            column
        ))
        .dim()
    );
}

fn print_none(message: &str) {
    println!("      {}", style(message).dim());
}

/// Format a monetary amount with digit grouping, no decimals.
pub fn format_amount(value: f64) -> String {
    format!("{}원", group_digits(value.round() as i64))
}

fn group_digits(value: i64) -> String {
    let negative = value < 0;
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
