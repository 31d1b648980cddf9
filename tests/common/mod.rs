//! Shared test utilities and fixture generators

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

/// Canonical eight-row order-history fixture.
///
/// Known characteristics:
/// - paid_amount total 161,000 over 8 orders (AOV 20,125)
/// - product revenue: Tangerine 5kg 48,000 / Gift Set 45,000 /
///   Tangerine 10kg 44,000 / Tangerine Juice 24,000
/// - channel revenue: NaverStore 68,000 / KakaoTalk 64,000 / Homepage 29,000
/// - region revenue: Seoul 94,000 (4 orders) / Jeju 37,000 / Busan 30,000
/// - customer u01 places 3 orders worth 78,000
/// - 3 event-flagged rows; 4 addresses contain "Seoul"
/// - sellers: alpha+bravo active in 2024-01, bravo+charlie in 2024-02,
///   charlie alone in 2024-03
pub const SAMPLE_ORDERS_CSV: &str = r#"order_no,order_date,channel,product,quantity,unit_price,supply_price,paid_amount,cancel_amount,event_flag,uid,seller,region,address,purpose
A001,2024-01-05 10:30:00,NaverStore,Tangerine 5kg,2,"12,000",9000,"24,000",0,N,u01,alpha,Seoul,Mapo-gu Seoul,home
A002,2024-01-12 14:00:00,NaverStore,Tangerine 10kg,1,"22,000",17000,"22,000",0,Y,u02,alpha,Busan,Haeundae Busan,home
A003,2024-01-20 09:15:00,NaverStore,Tangerine 10kg,1,"22,000",17000,"22,000",0,N,u01,bravo,Seoul,Gangnam Seoul,gift
A004,2024-02-03 16:45:00,KakaoTalk,Tangerine 5kg,2,"12,000",9000,"24,000",0,Y,u03,bravo,Jeju,Jeju City,home
A005,2024-02-14 11:00:00,KakaoTalk,Gift Set,1,"32,000",24000,"32,000",0,N,u01,charlie,Seoul,Jongno Seoul,corporate gift
A006,2024-02-25 19:30:00,Homepage,Gift Set,1,"13,000",10000,"13,000",0,Y,u04,charlie,Jeju,Seogwipo Jeju,gift
A007,2024-03-08 08:20:00,Homepage,Tangerine Juice,2,"8,000",6000,"16,000",0,N,u05,charlie,Seoul,Nowon Seoul,home
A008,2024-03-15 13:10:00,KakaoTalk,Tangerine Juice,1,"8,000",6000,"8,000",0,N,u02,charlie,Busan,Sasang Busan,home
"#;

/// Write CSV text to a temp file and return the handle plus its path.
/// The TempDir must stay alive for the duration of the test.
pub fn write_orders_csv(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("orders.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    drop(file);
    (temp_dir, csv_path)
}

/// Write the canonical fixture to a temp file.
pub fn write_sample_csv() -> (TempDir, PathBuf) {
    write_orders_csv(SAMPLE_ORDERS_CSV)
}

/// Fixture without the optional seller and region columns, for degraded-view
/// tests.
pub const MINIMAL_ORDERS_CSV: &str = r#"order_date,channel,product,paid_amount,uid
2024-01-05 10:30:00,NaverStore,Tangerine 5kg,24000,u01
2024-01-12 14:00:00,KakaoTalk,Tangerine 10kg,22000,u02
2024-02-03 16:45:00,NaverStore,Tangerine 5kg,24000,u01
"#;
