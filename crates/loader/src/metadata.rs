use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use core_types::FundMetadata;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::error::LoaderError;

/// One row of the pipe-delimited metadata file, with the source's original
/// header names.
#[derive(Debug, Deserialize)]
struct RawMetadataRow {
    #[serde(rename = "Fund ID")]
    fund_id: String,
    #[serde(rename = "Fund Name")]
    name: String,
    #[serde(rename = "Manager")]
    manager: String,
    #[serde(rename = "Inception Date")]
    inception_date: NaiveDate,
    #[serde(rename = "Base Currency")]
    base_currency: String,
    #[serde(rename = "Investment Strategy")]
    investment_strategy: String,
    #[serde(rename = "Fund Size (in millions)")]
    fund_size_millions: Decimal,
    #[serde(rename = "Initial Price")]
    initial_price: Decimal,
}

/// Reads fund metadata from a pipe-delimited text file.
///
/// The source writes fund ids as `fund1`, `fund2`, ...; the prefix is
/// stripped to recover the stable integer id. Duplicate fund ids are
/// rejected.
pub fn load_metadata(path: &Path) -> Result<Vec<FundMetadata>, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut seen = BTreeSet::new();
    let mut funds = Vec::new();
    for row in reader.deserialize::<RawMetadataRow>() {
        let raw = row?;
        let fund_id = parse_fund_id(&raw.fund_id)?;
        if !seen.insert(fund_id) {
            return Err(LoaderError::DuplicateFund(fund_id));
        }

        funds.push(FundMetadata::new(
            fund_id,
            raw.name,
            raw.manager,
            raw.inception_date,
            &raw.base_currency,
            raw.investment_strategy,
            raw.fund_size_millions,
            raw.initial_price,
        )?);
    }

    info!(count = funds.len(), path = %path.display(), "Loaded fund metadata");
    Ok(funds)
}

/// Recovers the integer fund id from either a bare integer or the source's
/// `fundN` convention.
fn parse_fund_id(raw: &str) -> Result<i32, LoaderError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("fund").unwrap_or(trimmed);
    digits
        .parse::<i32>()
        .map_err(|_| LoaderError::InvalidFundId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const HEADER: &str = "Fund ID|Fund Name|Manager|Inception Date|Base Currency|Investment Strategy|Fund Size (in millions)|Initial Price";

    fn write_metadata_file(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn parses_pipe_delimited_metadata() {
        let file = write_metadata_file(&[
            "fund1|Alpha Growth|Jane Doe|2015-06-01|USD|Equity Growth|250|1000",
            "fund2|Beta Income|John Roe|2018-01-15|EUR|Fixed Income|120|1000",
        ]);

        let funds = load_metadata(file.path()).unwrap();
        assert_eq!(funds.len(), 2);
        assert_eq!(funds[0].fund_id, 1);
        assert_eq!(funds[0].name, "Alpha Growth");
        assert_eq!(
            funds[0].inception_date,
            NaiveDate::from_ymd_opt(2015, 6, 1).unwrap()
        );
        assert_eq!(funds[0].fund_size_millions, dec!(250));
        assert_eq!(funds[1].fund_id, 2);
        assert_eq!(funds[1].base_currency, "EUR");
        assert_eq!(funds[1].initial_price, dec!(1000));
    }

    #[test]
    fn accepts_bare_integer_fund_ids() {
        let file =
            write_metadata_file(&["7|Gamma Value|Ann Poe|2020-03-31|GBP|Value Equity|80|1000"]);
        let funds = load_metadata(file.path()).unwrap();
        assert_eq!(funds[0].fund_id, 7);
    }

    #[test]
    fn rejects_unparseable_fund_id() {
        let file =
            write_metadata_file(&["fundX|Gamma Value|Ann Poe|2020-03-31|GBP|Value Equity|80|1000"]);
        assert!(matches!(
            load_metadata(file.path()),
            Err(LoaderError::InvalidFundId(_))
        ));
    }

    #[test]
    fn rejects_duplicate_fund_ids() {
        let file = write_metadata_file(&[
            "fund1|Alpha Growth|Jane Doe|2015-06-01|USD|Equity Growth|250|1000",
            "fund1|Alpha Clone|Jane Doe|2015-06-01|USD|Equity Growth|250|1000",
        ]);
        assert!(matches!(
            load_metadata(file.path()),
            Err(LoaderError::DuplicateFund(1))
        ));
    }

    #[test]
    fn rejects_malformed_currency_code() {
        let file = write_metadata_file(&[
            "fund1|Alpha Growth|Jane Doe|2015-06-01|DOLLARS|Equity Growth|250|1000",
        ]);
        assert!(matches!(
            load_metadata(file.path()),
            Err(LoaderError::Record(_))
        ));
    }
}
