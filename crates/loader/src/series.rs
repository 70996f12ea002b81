use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::str::FromStr;

use core_types::FundObservation;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::LoaderError;

/// The wire format of one per-fund series file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFormat {
    Csv,
    Json,
}

impl FromStr for SeriesFormat {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(SeriesFormat::Csv),
            "json" => Ok(SeriesFormat::Json),
            other => Err(LoaderError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Describes one per-fund input file. The source files carry no fund id of
/// their own, so the caller assigns the stable id here.
#[derive(Debug, Clone)]
pub struct SeriesSource {
    pub fund_id: i32,
    pub path: PathBuf,
    pub format: SeriesFormat,
}

/// One raw series row, with the source's original column names. Year and
/// month arrive as decimals because one upstream schema stores them as
/// floats; integrality is enforced during normalization instead of silently
/// truncating.
#[derive(Debug, Deserialize)]
struct RawSeriesRow {
    #[serde(rename = "Year")]
    year: Decimal,
    #[serde(rename = "Month")]
    month: Decimal,
    #[serde(rename = "Price Per Share")]
    price_per_share: Decimal,
    #[serde(rename = "Dividend Per Share")]
    dividend_per_share: Decimal,
}

/// Reads every series source and partitions the observations by fund id.
///
/// Each fund's series is sorted ascending by period key before it is handed
/// to the engine, and duplicate periods are rejected. Gaps are accepted: a
/// skipped month simply leaves the engine's `last_price` at the last
/// observed close, so the next base return spans the whole gap. A warning is
/// logged when a gap is detected.
pub fn load_observations(
    sources: &[SeriesSource],
) -> Result<BTreeMap<i32, Vec<FundObservation>>, LoaderError> {
    let mut by_fund: BTreeMap<i32, Vec<FundObservation>> = BTreeMap::new();

    for source in sources {
        let rows = read_rows(source)?;
        let series = by_fund.entry(source.fund_id).or_default();
        for raw in rows {
            series.push(normalize_row(source.fund_id, raw)?);
        }
    }

    for (fund_id, series) in &mut by_fund {
        series.sort_by_key(FundObservation::period_key);

        for pair in series.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.period_key() == next.period_key() {
                return Err(LoaderError::DuplicatePeriod {
                    fund_id: *fund_id,
                    year: next.year,
                    month: next.month,
                });
            }

            let elapsed = (next.year - prev.year) * 12 + (next.month - prev.month);
            if elapsed > 1 {
                warn!(
                    fund_id,
                    from = %format!("{}-{:02}", prev.year, prev.month),
                    to = %format!("{}-{:02}", next.year, next.month),
                    "Gap in observation series; the next base return spans the gap"
                );
            }
        }
    }

    let total: usize = by_fund.values().map(Vec::len).sum();
    info!(
        funds = by_fund.len(),
        observations = total,
        "Loaded fund observations"
    );
    Ok(by_fund)
}

fn read_rows(source: &SeriesSource) -> Result<Vec<RawSeriesRow>, LoaderError> {
    match source.format {
        SeriesFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_path(&source.path)?;
            reader
                .deserialize::<RawSeriesRow>()
                .map(|row| row.map_err(LoaderError::from))
                .collect()
        }
        SeriesFormat::Json => {
            let file = File::open(&source.path)?;
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
    }
}

/// Turns a raw row into a canonical observation, rejecting non-integral
/// year/month values rather than truncating them.
fn normalize_row(fund_id: i32, raw: RawSeriesRow) -> Result<FundObservation, LoaderError> {
    let year = to_whole_number(fund_id, "Year", raw.year)?;
    let month = to_whole_number(fund_id, "Month", raw.month)?;
    Ok(FundObservation::new(
        fund_id,
        year,
        month,
        raw.price_per_share,
        raw.dividend_per_share,
    )?)
}

fn to_whole_number(fund_id: i32, field: &'static str, value: Decimal) -> Result<i32, LoaderError> {
    if !value.fract().is_zero() {
        return Err(LoaderError::NonIntegralField {
            fund_id,
            field,
            value: value.to_string(),
        });
    }

    value.to_i32().ok_or_else(|| LoaderError::NonIntegralField {
        fund_id,
        field,
        value: value.to_string(),
    })
}
