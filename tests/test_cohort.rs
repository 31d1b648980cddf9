//! Integration tests for seller cohort and churn analysis

use farmsight::pipeline::{cohort, filter, loader, Availability, FilterCriteria, SellerFlow};

#[path = "common/mod.rs"]
mod common;

fn flow_for(csv: &str) -> Vec<SellerFlow> {
    let (_dir, csv_path) = common::write_orders_csv(csv);
    let dataset = loader::load(&csv_path).unwrap();
    let view = filter::apply(&dataset, &FilterCriteria::default()).unwrap();
    cohort::monthly_seller_flow(&view).unwrap().ready().unwrap()
}

#[test]
fn test_monthly_flow_over_sample_fixture() {
    // Activity: Jan {alpha, bravo}, Feb {bravo, charlie}, Mar {charlie}.
    let (_dir, csv_path) = common::write_sample_csv();
    let dataset = loader::load(&csv_path).unwrap();
    let view = filter::apply(&dataset, &FilterCriteria::default()).unwrap();

    let flow = cohort::monthly_seller_flow(&view).unwrap().ready().unwrap();

    assert_eq!(
        flow,
        vec![
            SellerFlow {
                period: "2024-01".to_string(),
                new_sellers: 2,
                churned: 0,
            },
            SellerFlow {
                period: "2024-02".to_string(),
                new_sellers: 1,
                churned: -1,
            },
            SellerFlow {
                period: "2024-03".to_string(),
                new_sellers: 0,
                churned: -1,
            },
        ]
    );
}

#[test]
fn test_churn_carries_a_negative_sign() {
    let (_dir, csv_path) = common::write_sample_csv();
    let dataset = loader::load(&csv_path).unwrap();
    let view = filter::apply(&dataset, &FilterCriteria::default()).unwrap();

    let flow = cohort::monthly_seller_flow(&view).unwrap().ready().unwrap();

    assert!(flow.iter().all(|f| f.churned <= 0));
    assert!(flow.iter().all(|f| f.new_sellers >= 0));
}

#[test]
fn test_single_month_has_no_churn() {
    let csv = "order_date,channel,product,paid_amount,uid,seller\n\
               2024-01-05 10:00:00,NaverStore,Tangerine 5kg,24000,u01,alpha\n\
               2024-01-12 10:00:00,NaverStore,Tangerine 5kg,24000,u02,bravo\n";
    let flow = flow_for(csv);

    assert_eq!(flow.len(), 1);
    assert_eq!(flow[0].new_sellers, 2);
    assert_eq!(flow[0].churned, 0, "No predecessor month, no churn");
}

#[test]
fn test_returning_seller_is_not_new_again() {
    // alpha sells in January, skips February, returns in March.
    let csv = "order_date,channel,product,paid_amount,uid,seller\n\
               2024-01-05 10:00:00,NaverStore,Tangerine 5kg,24000,u01,alpha\n\
               2024-02-05 10:00:00,NaverStore,Tangerine 5kg,24000,u02,bravo\n\
               2024-03-05 10:00:00,NaverStore,Tangerine 5kg,24000,u03,alpha\n";
    let flow = flow_for(csv);

    assert_eq!(flow.len(), 3);
    assert_eq!((flow[0].new_sellers, flow[0].churned), (1, 0));
    // February: bravo is new, alpha churned.
    assert_eq!((flow[1].new_sellers, flow[1].churned), (1, -1));
    // March: alpha is back but was first seen in January, so not new;
    // bravo churned.
    assert_eq!((flow[2].new_sellers, flow[2].churned), (0, -1));
}

#[test]
fn test_flow_unavailable_without_seller_column() {
    let (_dir, csv_path) = common::write_orders_csv(common::MINIMAL_ORDERS_CSV);
    let dataset = loader::load(&csv_path).unwrap();
    let view = filter::apply(&dataset, &FilterCriteria::default()).unwrap();

    let flow = cohort::monthly_seller_flow(&view).unwrap();

    assert_eq!(flow, Availability::Unavailable { column: "seller" });
}

#[test]
fn test_flow_over_empty_view_is_empty() {
    let (_dir, csv_path) = common::write_sample_csv();
    let dataset = loader::load(&csv_path).unwrap();
    let criteria = FilterCriteria {
        keyword: Some("no such thing".to_string()),
        ..FilterCriteria::default()
    };
    let view = filter::apply(&dataset, &criteria).unwrap();

    let flow = cohort::monthly_seller_flow(&view).unwrap().ready().unwrap();

    assert!(flow.is_empty());
}

#[test]
fn test_flow_recomputes_per_view() {
    let (_dir, csv_path) = common::write_sample_csv();
    let dataset = loader::load(&csv_path).unwrap();

    let full = filter::apply(&dataset, &FilterCriteria::default()).unwrap();
    let full_flow = cohort::monthly_seller_flow(&full).unwrap().ready().unwrap();

    let january = FilterCriteria {
        from: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
        to: chrono::NaiveDate::from_ymd_opt(2024, 1, 31),
        ..FilterCriteria::default()
    };
    let narrow = filter::apply(&dataset, &january).unwrap();
    let narrow_flow = cohort::monthly_seller_flow(&narrow).unwrap().ready().unwrap();

    assert_eq!(full_flow.len(), 3);
    assert_eq!(narrow_flow.len(), 1, "Narrowed view yields a narrowed series");
    assert_eq!(narrow_flow[0].period, "2024-01");
}
