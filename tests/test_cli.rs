//! Tests for CLI argument parsing and end-to-end binary runs

use assert_cmd::Command;
use clap::Parser;
use farmsight::cli::{Cli, View};
use predicates::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["farmsight", "-i", "orders.csv"]);

    assert_eq!(cli.view, View::All, "Default view should be all");
    assert_eq!(cli.top, 20, "Default ranking size should be 20");
    assert!(!cli.event_only);
    assert!(cli.channel.is_empty());
    assert_eq!(cli.infer_schema_length, 10000);
    assert!(cli.json.is_none());
}

#[test]
fn test_cli_channel_list_is_comma_separated() {
    let cli = Cli::parse_from([
        "farmsight",
        "-i",
        "orders.csv",
        "-c",
        "NaverStore,KakaoTalk,Homepage",
    ]);

    assert_eq!(cli.channel, vec!["NaverStore", "KakaoTalk", "Homepage"]);
}

#[test]
fn test_cli_rejects_malformed_date() {
    let result = Cli::try_parse_from(["farmsight", "-i", "orders.csv", "--from", "01/05/2024"]);

    assert!(result.is_err(), "Dates must be YYYY-MM-DD");
}

#[test]
fn test_binary_renders_dashboard() {
    let (_dir, csv_path) = common::write_sample_csv();

    Command::cargo_bin("farmsight")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Sales"))
        .stdout(predicate::str::contains("161,000"))
        .stdout(predicate::str::contains("Tangerine 5kg"));
}

#[test]
fn test_binary_empty_result_is_not_an_error() {
    let (_dir, csv_path) = common::write_sample_csv();

    Command::cargo_bin("farmsight")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("-k")
        .arg("no such product")
        .assert()
        .success()
        .stdout(predicate::str::contains("No orders match"));
}

#[test]
fn test_binary_fails_on_missing_file() {
    Command::cargo_bin("farmsight")
        .unwrap()
        .arg("-i")
        .arg("/nonexistent/orders.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dataset file not found"));
}

#[test]
fn test_binary_exports_json() {
    let (dir, csv_path) = common::write_sample_csv();
    let json_path = dir.path().join("dashboard.json");

    Command::cargo_bin("farmsight")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("--json")
        .arg(&json_path)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&json_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(parsed["kpis"]["total_sales"], 161000.0);
    assert_eq!(parsed["rows"], 8);
    assert_eq!(parsed["seller_flow"][0]["new_sellers"], 2);
    assert_eq!(parsed["seller_flow"][1]["churned"], -1);
}

#[test]
fn test_binary_sellers_view_shows_flow() {
    let (_dir, csv_path) = common::write_sample_csv();

    Command::cargo_bin("farmsight")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("--view")
        .arg("sellers")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seller Inflow / Outflow"))
        .stdout(predicate::str::contains("2024-02"));
}
