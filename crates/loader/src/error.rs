use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse delimited source: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON source: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unrecognized fund id '{0}' in metadata (expected e.g. 'fund1' or '1')")]
    InvalidFundId(String),

    #[error("Fund {fund_id}: field '{field}' must be a whole number, got {value}")]
    NonIntegralField {
        fund_id: i32,
        field: &'static str,
        value: String,
    },

    #[error("Fund {fund_id}: more than one observation for period {year}-{month:02}")]
    DuplicatePeriod { fund_id: i32, year: i32, month: i32 },

    #[error("Duplicate metadata row for fund {0}")]
    DuplicateFund(i32),

    #[error("Unsupported series format '{0}' (expected 'csv' or 'json')")]
    UnsupportedFormat(String),

    #[error("Rejected record: {0}")]
    Record(#[from] CoreError),
}
