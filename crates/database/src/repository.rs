use crate::DbError;
use core_types::{FundMetadata, PerformanceRecord};
use sqlx::postgres::PgPool;
use tracing::info;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Saves a batch of fund metadata rows within a single transaction.
    ///
    /// Metadata is immutable after creation, so an existing row is left
    /// untouched (`ON CONFLICT DO NOTHING`); re-running the pipeline never
    /// rewrites it.
    pub async fn save_fund_metadata(&self, funds: &[FundMetadata]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for fund in funds {
            sqlx::query(
                r#"
                INSERT INTO fund_metadata (
                    fund_id, fund_name, manager, inception_date, base_currency,
                    investment_strategy, fund_size_millions, initial_price
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (fund_id) DO NOTHING
                "#,
            )
            .bind(fund.fund_id)
            .bind(&fund.name)
            .bind(&fund.manager)
            .bind(fund.inception_date)
            .bind(&fund.base_currency)
            .bind(&fund.investment_strategy)
            .bind(fund.fund_size_millions)
            .bind(fund.initial_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(count = funds.len(), "Saved fund metadata");
        Ok(())
    }

    /// Saves a batch of performance records within a single transaction for
    /// atomicity.
    ///
    /// A full pipeline run recomputes each fund's entire series, so a
    /// conflicting row is overwritten rather than skipped: re-running the
    /// pipeline refreshes the stored metrics.
    pub async fn save_performance_records(
        &self,
        records: &[PerformanceRecord],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO performance_metrics (
                    fund_id, year, month, price_per_share, dividend_per_share,
                    base_monthly_return_pct, ltd_return_pct, ytd_return_pct
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (fund_id, year, month) DO UPDATE SET
                    price_per_share = EXCLUDED.price_per_share,
                    dividend_per_share = EXCLUDED.dividend_per_share,
                    base_monthly_return_pct = EXCLUDED.base_monthly_return_pct,
                    ltd_return_pct = EXCLUDED.ltd_return_pct,
                    ytd_return_pct = EXCLUDED.ytd_return_pct
                "#,
            )
            .bind(record.fund_id)
            .bind(record.year)
            .bind(record.month)
            .bind(record.price_per_share)
            .bind(record.dividend_per_share)
            .bind(record.base_monthly_return_pct)
            .bind(record.ltd_return_pct)
            .bind(record.ytd_return_pct)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Fetches the stored performance series for one fund, ordered
    /// chronologically.
    pub async fn get_performance_for_fund(
        &self,
        fund_id: i32,
    ) -> Result<Vec<PerformanceRecord>, DbError> {
        let records = sqlx::query_as::<_, PerformanceRecord>(
            r#"
            SELECT fund_id, year, month, price_per_share, dividend_per_share,
                   base_monthly_return_pct, ltd_return_pct, ytd_return_pct
            FROM performance_metrics
            WHERE fund_id = $1
            ORDER BY year ASC, month ASC
            "#,
        )
        .bind(fund_id)
        .fetch_all(&self.pool)
        .await?;

        if records.is_empty() {
            return Err(DbError::NotFound);
        }

        Ok(records)
    }
}
