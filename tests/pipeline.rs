//! End-to-end test of the load and compute phases: heterogeneous source
//! files in, per-fund performance records out. The storage phase is covered
//! by its own crate and needs a live database, so it is not exercised here.

use std::collections::HashMap;
use std::fs;

use analytics::MetricsEngine;
use loader::{SeriesFormat, SeriesSource};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const METADATA: &str = "\
Fund ID|Fund Name|Manager|Inception Date|Base Currency|Investment Strategy|Fund Size (in millions)|Initial Price
fund1|Alpha Growth|Jane Doe|2015-06-01|USD|Equity Growth|250|1000
fund2|Beta Income|John Roe|2018-01-15|EUR|Fixed Income|120|1000
";

const FUND1_CSV: &str = "\
Year,Month,Price Per Share,Dividend Per Share
2023,11,1050,10
2023,12,1100,0
2024,1,1122,0
";

// The same series as fund1, as the JSON source writes it.
const FUND2_JSON: &str = r#"[
    {"Year": 2023, "Month": 11, "Price Per Share": 1050, "Dividend Per Share": 10},
    {"Year": 2023, "Month": 12, "Price Per Share": 1100, "Dividend Per Share": 0},
    {"Year": 2024, "Month": 1, "Price Per Share": 1122, "Dividend Per Share": 0}
]"#;

#[test]
fn computes_metrics_from_heterogeneous_sources() {
    let dir = tempfile::tempdir().unwrap();
    let metadata_path = dir.path().join("fund_metadata.txt");
    let fund1_path = dir.path().join("fund1.csv");
    let fund2_path = dir.path().join("fund2.json");
    fs::write(&metadata_path, METADATA).unwrap();
    fs::write(&fund1_path, FUND1_CSV).unwrap();
    fs::write(&fund2_path, FUND2_JSON).unwrap();

    let metadata = loader::load_metadata(&metadata_path).unwrap();
    assert_eq!(metadata.len(), 2);

    let sources = [
        SeriesSource {
            fund_id: 1,
            path: fund1_path,
            format: SeriesFormat::Csv,
        },
        SeriesSource {
            fund_id: 2,
            path: fund2_path,
            format: SeriesFormat::Json,
        },
    ];
    let observations = loader::load_observations(&sources).unwrap();

    let initial_prices: HashMap<i32, Decimal> = metadata
        .iter()
        .map(|fund| (fund.fund_id, fund.initial_price))
        .collect();

    let mut records_by_fund = HashMap::new();
    for (fund_id, series) in &observations {
        let engine = MetricsEngine::new(initial_prices[fund_id]);
        records_by_fund.insert(*fund_id, engine.compute_fund(series).unwrap());
    }

    // Fund 1: November 2023 starts from the nominal 1000.
    let fund1 = &records_by_fund[&1];
    assert_eq!(fund1.len(), 3);
    assert_eq!(fund1[0].base_monthly_return_pct, dec!(4.00));
    assert_eq!(fund1[0].ltd_return_pct, dec!(4.00));
    assert_eq!(fund1[0].ytd_return_pct, dec!(4.00));

    // December compounds within 2023.
    assert_eq!(fund1[1].base_monthly_return_pct, dec!(4.76));
    assert_eq!(fund1[1].ltd_return_pct, dec!(8.95));
    assert_eq!(fund1[1].ytd_return_pct, dec!(8.95));

    // January 2024 resets YTD but not LTD.
    assert_eq!(fund1[2].base_monthly_return_pct, dec!(2.00));
    assert_eq!(fund1[2].ltd_return_pct, dec!(11.13));
    assert_eq!(fund1[2].ytd_return_pct, dec!(2.00));

    // Fund 2 carries the identical series through the JSON format: its
    // metrics must match fund 1's exactly (fund isolation, format
    // normalization).
    let fund2 = &records_by_fund[&2];
    assert_eq!(fund2.len(), fund1.len());
    for (a, b) in fund1.iter().zip(fund2.iter()) {
        assert_eq!(a.year, b.year);
        assert_eq!(a.month, b.month);
        assert_eq!(a.base_monthly_return_pct, b.base_monthly_return_pct);
        assert_eq!(a.ltd_return_pct, b.ltd_return_pct);
        assert_eq!(a.ytd_return_pct, b.ytd_return_pct);
    }
}
