//! Terminal styling utilities for the dashboard output

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use console::{style, Emoji};

use crate::pipeline::FilterCriteria;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static CALENDAR: Emoji<'_, '_> = Emoji("📆 ", "");
pub static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
pub static TANGERINE: Emoji<'_, '_> = Emoji("🍊 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ███████╗ █████╗ ██████╗ ███╗   ███╗███████╗██╗ ██████╗ ██╗  ██╗████████╗
    ██╔════╝██╔══██╗██╔══██╗████╗ ████║██╔════╝██║██╔════╝ ██║  ██║╚══██╔══╝
    █████╗  ███████║██████╔╝██╔████╔██║███████╗██║██║  ███╗███████║   ██║
    ██╔══╝  ██╔══██║██╔══██╗██║╚██╔╝██║╚════██║██║██║   ██║██╔══██║   ██║
    ██║     ██║  ██║██║  ██║██║ ╚═╝ ██║███████║██║╚██████╔╝██║  ██║   ██║
    ╚═╝     ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝     ╚═╝╚══════╝╚═╝ ╚═════╝ ╚═╝  ╚═╝   ╚═╝
    "#;

    println!();
    println!("{}", style(banner).color256(208).bold());
    println!(
        "    {} {}",
        TANGERINE,
        style("Sales analytics for farm e-commerce order history").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the configuration card for the current run
pub fn print_config(input: &Path, criteria: &FilterCriteria, vip_limit: usize) {
    println!("    {}", style("Configuration").cyan().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!("      {} Input:      {}", FOLDER, truncate_path(input, 40));
    match criteria.date_bounds() {
        Some((start, end)) => {
            println!("      {} Date range: {} to {}", CALENDAR, start, end);
        }
        None => println!("      {} Date range: full history", CALENDAR),
    }
    let channels = if criteria.channels.is_empty() {
        "all".to_string()
    } else {
        criteria.channels.join(", ")
    };
    println!("      {} Channels:   {}", INFO, channels);
    if criteria.event_only {
        println!("      {} Event orders only", INFO);
    }
    if let Some(term) = criteria.search_term() {
        println!("      {} Keyword:    '{}'", SEARCH, style(term).yellow());
    }
    println!("      {} VIP limit:  {}", INFO, vip_limit);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a section header inside a step
pub fn print_section(title: &str) {
    println!();
    println!("    {}", style(title).white().bold());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!(
        "    {} {}",
        style("⚠").yellow().bold(),
        style(message).yellow()
    );
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize) {
    println!(
        "      Found {} {}",
        style(count).yellow().bold(),
        description
    );
}

/// Print elapsed time for a step
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Farmsight analysis complete!").green().bold()
    );
    println!();
}

/// Format a date range for display
pub fn format_span(span: Option<(NaiveDate, NaiveDate)>) -> String {
    match span {
        Some((min, max)) => format!("{} to {}", min, max),
        None => "no orders".to_string(),
    }
}

/// Truncate a path for display in the configuration card. Operates on
/// characters, not bytes, so multi-byte path names cannot split mid-character.
fn truncate_path(path: &Path, max_len: usize) -> String {
    let display = path.display().to_string();
    let chars: Vec<char> = display.chars().collect();
    if chars.len() <= max_len {
        display
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
