use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub pipeline: Pipeline,
    pub sources: Sources,
}

/// Parameters for the metric computation itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    /// The nominal price every fund starts at. Used as the denominator for a
    /// fund's first month unless its metadata declares its own initial price.
    pub initial_price: Decimal,
}

/// Describes where the raw input files live.
#[derive(Debug, Clone, Deserialize)]
pub struct Sources {
    /// Path to the pipe-delimited fund metadata file.
    pub metadata_file: String,
    /// One entry per per-fund series file.
    pub funds: Vec<FundSource>,
}

/// One per-fund series file. The files themselves carry no fund id, so the
/// configuration assigns the stable id explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct FundSource {
    pub fund_id: i32,
    pub path: String,
    /// The wire format: "csv" or "json".
    pub format: String,
}

impl Config {
    /// Checks cross-field rules the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.initial_price <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.initial_price must be positive, got {}",
                self.pipeline.initial_price
            )));
        }

        let mut seen = BTreeSet::new();
        for fund in &self.sources.funds {
            if fund.fund_id <= 0 {
                return Err(ConfigError::ValidationError(format!(
                    "sources.funds fund_id must be positive, got {}",
                    fund.fund_id
                )));
            }
            if !seen.insert(fund.fund_id) {
                return Err(ConfigError::ValidationError(format!(
                    "sources.funds lists fund {} more than once",
                    fund.fund_id
                )));
            }
        }

        Ok(())
    }
}
