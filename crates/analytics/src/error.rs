use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error(
        "Observations for fund {fund_id} are out of chronological order: \
         {prev_year}-{prev_month:02} was followed by {year}-{month:02}"
    )]
    OutOfOrder {
        fund_id: i32,
        prev_year: i32,
        prev_month: i32,
        year: i32,
        month: i32,
    },

    #[error("Observation stream mixes funds: expected fund {expected}, found fund {found}")]
    MixedFunds { expected: i32, found: i32 },
}
