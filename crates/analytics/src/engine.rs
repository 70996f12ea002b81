use crate::error::AnalyticsError;
use core_types::{FundObservation, PerformanceRecord, NOMINAL_INITIAL_PRICE};
use rust_decimal::Decimal;
use tracing::debug;

/// A deterministic calculator that folds one fund's ordered observation
/// stream into monthly performance records.
///
/// The engine carries no state between calls; all per-fund state lives in a
/// `FundState` created fresh for every `compute_fund` invocation, so the same
/// input always produces the same output and funds never interact.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine {
    initial_price: Decimal,
}

impl MetricsEngine {
    /// Creates an engine whose first-month denominator is `initial_price`.
    pub fn new(initial_price: Decimal) -> Self {
        Self { initial_price }
    }

    /// Computes the three return metrics for every observation of a single
    /// fund.
    ///
    /// # Arguments
    ///
    /// * `observations` - One fund's observations, sorted ascending by
    ///   `(year, month)`. An empty slice yields an empty output.
    ///
    /// # Errors
    ///
    /// Ordering is load-bearing for compounding, so the engine fails fast on
    /// a non-ascending period key or on a slice that mixes fund ids, rather
    /// than silently producing nonsensical compounded returns.
    pub fn compute_fund(
        &self,
        observations: &[FundObservation],
    ) -> Result<Vec<PerformanceRecord>, AnalyticsError> {
        let mut records = Vec::with_capacity(observations.len());
        let mut state = FundState::new(self.initial_price);
        let mut fund_id: Option<i32> = None;
        let mut prev_key: Option<(i32, i32)> = None;

        for observation in observations {
            match fund_id {
                None => fund_id = Some(observation.fund_id),
                Some(expected) if expected != observation.fund_id => {
                    return Err(AnalyticsError::MixedFunds {
                        expected,
                        found: observation.fund_id,
                    });
                }
                Some(_) => {}
            }

            let key = observation.period_key();
            if let Some((prev_year, prev_month)) = prev_key {
                if key <= (prev_year, prev_month) {
                    return Err(AnalyticsError::OutOfOrder {
                        fund_id: observation.fund_id,
                        prev_year,
                        prev_month,
                        year: observation.year,
                        month: observation.month,
                    });
                }
            }
            prev_key = Some(key);

            records.push(state.step(observation));
        }

        if let Some(fund_id) = fund_id {
            debug!(
                fund_id,
                months = records.len(),
                "Computed performance metrics"
            );
        }

        Ok(records)
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(NOMINAL_INITIAL_PRICE)
    }
}

/// The running reduction state for one fund.
///
/// The factors are kept unrounded between steps; rounding happens only when a
/// percentage is emitted, so rounding error never feeds back into the
/// compounding.
struct FundState {
    last_price: Decimal,
    ltd_factor: Decimal,
    ytd_factor: Decimal,
    current_year: Option<i32>,
}

impl FundState {
    fn new(initial_price: Decimal) -> Self {
        Self {
            last_price: initial_price,
            ltd_factor: Decimal::ONE,
            ytd_factor: Decimal::ONE,
            current_year: None,
        }
    }

    fn step(&mut self, observation: &FundObservation) -> PerformanceRecord {
        // The denominator is the prior month's closing price, unadjusted for
        // the prior month's dividend. A dividend only reduces the numerator
        // of the month in which it is paid.
        //
        // A zero prior price makes the ratio undefined; the affected return
        // is reported as 0 and the compounding factor contribution is 1, so
        // the fund's sequence continues (the "no missing metrics" rule).
        let base_return = (observation.price_per_share - observation.dividend_per_share)
            .checked_div(self.last_price)
            .map(|gross| gross - Decimal::ONE)
            .unwrap_or(Decimal::ZERO);
        let factor = Decimal::ONE + base_return;

        self.ltd_factor *= factor;

        // The first month of a calendar year (including the very first
        // observation) restarts YTD compounding from scratch.
        if self.current_year != Some(observation.year) {
            self.ytd_factor = Decimal::ONE;
            self.current_year = Some(observation.year);
        }
        self.ytd_factor *= factor;

        let record = PerformanceRecord {
            fund_id: observation.fund_id,
            year: observation.year,
            month: observation.month,
            price_per_share: observation.price_per_share,
            dividend_per_share: observation.dividend_per_share,
            base_monthly_return_pct: to_percentage(base_return),
            ltd_return_pct: to_percentage(self.ltd_factor - Decimal::ONE),
            ytd_return_pct: to_percentage(self.ytd_factor - Decimal::ONE),
        };

        self.last_price = observation.price_per_share;
        record
    }
}

/// Expresses a return as a percentage rounded to two decimal places.
fn to_percentage(value: Decimal) -> Decimal {
    (value * Decimal::ONE_HUNDRED).round_dp(2)
}
