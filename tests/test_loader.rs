//! Integration tests for dataset loading and normalization

use chrono::NaiveDate;
use farmsight::pipeline::{loader, schema, AnalyticsError, DatasetCache};
use polars::prelude::*;
use std::path::Path;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_sample_dataset() {
    let (_dir, csv_path) = common::write_sample_csv();

    let dataset = loader::load(&csv_path).unwrap();

    assert_eq!(dataset.height(), 8, "All fixture rows should survive loading");
    assert_eq!(dataset.dropped_rows(), 0);
    assert_eq!(dataset.source(), csv_path.as_path());
}

#[test]
fn test_missing_file_is_a_distinct_error() {
    let result = loader::load(Path::new("/nonexistent/orders.csv"));

    assert!(matches!(
        result,
        Err(AnalyticsError::DatasetNotFound(_))
    ));
}

#[test]
fn test_missing_required_column_is_rejected() {
    // No uid column.
    let csv = "order_date,channel,product,paid_amount\n\
               2024-01-05,NaverStore,Tangerine 5kg,24000\n";
    let (_dir, csv_path) = common::write_orders_csv(csv);

    let result = loader::load(&csv_path);

    match result {
        Err(AnalyticsError::MissingColumn { column }) => assert_eq!(column, "uid"),
        _ => panic!("expected MissingColumn error"),
    }
}

#[test]
fn test_thousands_separators_are_normalized() {
    let (_dir, csv_path) = common::write_sample_csv();

    let dataset = loader::load(&csv_path).unwrap();
    let df = dataset.frame();

    let paid = df.column(schema::PAID_AMOUNT).unwrap();
    assert_eq!(paid.dtype(), &DataType::Float64);
    let total = paid.f64().unwrap().sum().unwrap();
    assert_eq!(total, 161_000.0, "Quoted '24,000' style values should parse");
}

#[test]
fn test_date_column_is_retyped_and_derived() {
    let (_dir, csv_path) = common::write_sample_csv();

    let dataset = loader::load(&csv_path).unwrap();
    let df = dataset.frame();

    assert_eq!(
        df.column(schema::ORDER_DATE).unwrap().dtype(),
        &DataType::Date
    );
    assert!(dataset.has_column(schema::ORDER_MONTH));
    assert!(dataset.has_column(schema::ORDER_HOUR));
    assert!(dataset.has_column(schema::ORDER_WEEKDAY));

    let months = df.column(schema::ORDER_MONTH).unwrap().str().unwrap().clone();
    assert_eq!(months.get(0), Some("2024-01"));
    assert_eq!(months.get(7), Some("2024-03"));

    let span = dataset.date_span().unwrap();
    assert_eq!(span.0, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(span.1, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
}

#[test]
fn test_unparseable_dates_drop_rows_with_count() {
    let csv = "order_date,channel,product,paid_amount,uid\n\
               2024-01-05 10:30:00,NaverStore,Tangerine 5kg,24000,u01\n\
               not-a-date,NaverStore,Tangerine 5kg,24000,u02\n\
               2024-01-06,KakaoTalk,Gift Set,32000,u03\n";
    let (_dir, csv_path) = common::write_orders_csv(csv);

    let dataset = loader::load(&csv_path).unwrap();

    assert_eq!(dataset.height(), 2, "The bad-date row should be dropped");
    assert_eq!(dataset.dropped_rows(), 1);
}

#[test]
fn test_margin_derived_from_price_columns() {
    let (_dir, csv_path) = common::write_sample_csv();

    let dataset = loader::load(&csv_path).unwrap();

    assert!(dataset.has_column(schema::MARGIN));
    let margin = dataset
        .frame()
        .column(schema::MARGIN)
        .unwrap()
        .f64()
        .unwrap()
        .clone();
    // (12,000 - 9,000) * 2 for the first fixture row.
    assert_eq!(margin.get(0), Some(6000.0));
    assert_eq!(margin.sum(), Some(39_000.0));
}

#[test]
fn test_margin_omitted_without_price_columns() {
    let (_dir, csv_path) = common::write_orders_csv(common::MINIMAL_ORDERS_CSV);

    let dataset = loader::load(&csv_path).unwrap();

    assert!(!dataset.has_column(schema::MARGIN));
    assert!(!dataset.has_column(schema::SELLER));
    assert!(!dataset.has_column(schema::REGION));
}

#[test]
fn test_channels_are_distinct_and_sorted() {
    let (_dir, csv_path) = common::write_sample_csv();

    let dataset = loader::load(&csv_path).unwrap();

    assert_eq!(
        dataset.channels(),
        vec!["Homepage", "KakaoTalk", "NaverStore"]
    );
}

#[test]
fn test_cache_returns_same_dataset_for_same_path() {
    let (_dir, csv_path) = common::write_sample_csv();

    let mut cache = DatasetCache::new();
    let first = cache.load(&csv_path).unwrap();
    let second = cache.load(&csv_path).unwrap();

    assert!(
        std::sync::Arc::ptr_eq(&first, &second),
        "Second load should be served from the cache"
    );

    cache.reset();
    assert!(cache.is_empty());
    let third = cache.load(&csv_path).unwrap();
    assert!(
        !std::sync::Arc::ptr_eq(&first, &third),
        "Reset should force a reload"
    );
}
