use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::CoreError;

/// The system-wide nominal starting price assigned to every fund at inception.
/// It is the denominator for the very first month's return unless a fund's
/// metadata declares its own initial price.
pub const NOMINAL_INITIAL_PRICE: Decimal = dec!(1000);

/// Static descriptive data for a single fund. One row per fund, immutable
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundMetadata {
    pub fund_id: i32,
    pub name: String,
    pub manager: String,
    pub inception_date: NaiveDate,
    pub base_currency: String,
    pub investment_strategy: String,
    pub fund_size_millions: Decimal,
    pub initial_price: Decimal,
}

impl FundMetadata {
    /// Validates and constructs fund metadata.
    ///
    /// The currency code must be exactly three ASCII letters; it is stored
    /// uppercased. The fund id must be positive and the initial price
    /// strictly positive, since it seeds the first month's denominator.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fund_id: i32,
        name: impl Into<String>,
        manager: impl Into<String>,
        inception_date: NaiveDate,
        base_currency: &str,
        investment_strategy: impl Into<String>,
        fund_size_millions: Decimal,
        initial_price: Decimal,
    ) -> Result<Self, CoreError> {
        if fund_id <= 0 {
            return Err(CoreError::InvalidInput(
                "fund_id".to_string(),
                format!("must be a positive integer, got {fund_id}"),
            ));
        }

        let currency = base_currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidInput(
                "base_currency".to_string(),
                format!("expected a 3-letter currency code, got '{base_currency}'"),
            ));
        }

        if initial_price <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "initial_price".to_string(),
                format!("must be positive, got {initial_price}"),
            ));
        }

        Ok(Self {
            fund_id,
            name: name.into(),
            manager: manager.into(),
            inception_date,
            base_currency: currency.to_ascii_uppercase(),
            investment_strategy: investment_strategy.into(),
            fund_size_millions,
            initial_price,
        })
    }
}

/// A single raw observation for a fund: the closing price per share and the
/// dividend per share for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundObservation {
    pub fund_id: i32,
    pub year: i32,
    pub month: i32,
    pub price_per_share: Decimal,
    pub dividend_per_share: Decimal,
}

impl FundObservation {
    /// Validates and constructs an observation. The month must fall in
    /// `1..=12` and both price and dividend must be non-negative.
    pub fn new(
        fund_id: i32,
        year: i32,
        month: i32,
        price_per_share: Decimal,
        dividend_per_share: Decimal,
    ) -> Result<Self, CoreError> {
        if fund_id <= 0 {
            return Err(CoreError::InvalidInput(
                "fund_id".to_string(),
                format!("must be a positive integer, got {fund_id}"),
            ));
        }

        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidInput(
                "month".to_string(),
                format!("must be in 1..=12, got {month}"),
            ));
        }

        if price_per_share < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "price_per_share".to_string(),
                format!("must be non-negative, got {price_per_share}"),
            ));
        }

        if dividend_per_share < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "dividend_per_share".to_string(),
                format!("must be non-negative, got {dividend_per_share}"),
            ));
        }

        Ok(Self {
            fund_id,
            year,
            month,
            price_per_share,
            dividend_per_share,
        })
    }

    /// The key used for chronological ordering and per-fund uniqueness.
    pub fn period_key(&self) -> (i32, i32) {
        (self.year, self.month)
    }
}

/// The derived metrics for one fund and one month, alongside the raw inputs
/// they were computed from. Produced by the metric engine, persisted by the
/// storage sink, never mutated after creation.
///
/// All three returns are percentages rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PerformanceRecord {
    pub fund_id: i32,
    pub year: i32,
    pub month: i32,
    pub price_per_share: Decimal,
    pub dividend_per_share: Decimal,
    pub base_monthly_return_pct: Decimal,
    pub ltd_return_pct: Decimal,
    pub ytd_return_pct: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_uppercases_currency() {
        let meta = FundMetadata::new(
            1,
            "Alpha Growth",
            "Jane Doe",
            NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
            "usd",
            "Equity Growth",
            dec!(250),
            NOMINAL_INITIAL_PRICE,
        )
        .unwrap();
        assert_eq!(meta.base_currency, "USD");
    }

    #[test]
    fn metadata_rejects_bad_currency() {
        let result = FundMetadata::new(
            1,
            "Alpha Growth",
            "Jane Doe",
            NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
            "US1",
            "Equity Growth",
            dec!(250),
            NOMINAL_INITIAL_PRICE,
        );
        assert!(result.is_err());
    }

    #[test]
    fn metadata_rejects_non_positive_id() {
        let result = FundMetadata::new(
            0,
            "Alpha Growth",
            "Jane Doe",
            NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
            "USD",
            "Equity Growth",
            dec!(250),
            NOMINAL_INITIAL_PRICE,
        );
        assert!(result.is_err());
    }

    #[test]
    fn observation_rejects_month_out_of_range() {
        assert!(FundObservation::new(1, 2023, 13, dec!(1000), Decimal::ZERO).is_err());
        assert!(FundObservation::new(1, 2023, 0, dec!(1000), Decimal::ZERO).is_err());
    }

    #[test]
    fn observation_rejects_negative_amounts() {
        assert!(FundObservation::new(1, 2023, 1, dec!(-1), Decimal::ZERO).is_err());
        assert!(FundObservation::new(1, 2023, 1, dec!(1000), dec!(-0.5)).is_err());
    }

    #[test]
    fn period_keys_order_across_year_boundary() {
        let december = FundObservation::new(1, 2023, 12, dec!(1100), Decimal::ZERO).unwrap();
        let january = FundObservation::new(1, 2024, 1, dec!(1122), Decimal::ZERO).unwrap();
        assert!(december.period_key() < january.period_key());
    }
}
