//! Postgres-backed stat store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{SourceTable, StatStore};
use crate::errors::AppError;
use crate::models::statistic::{DashboardStat, NewStat, StatUpdate};

/// Production store over the back-office Postgres schema.
#[derive(Debug, Clone)]
pub struct PgStatStore {
    pool: PgPool,
}

impl PgStatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connectivity probe for the readiness endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl StatStore for PgStatStore {
    async fn fetch_all(&self) -> Result<Vec<DashboardStat>, AppError> {
        let rows = sqlx::query_as::<_, DashboardStat>(
            r#"
            SELECT id::text AS id, stat_name, stat_value, stat_change, trend, compare_text, updated_at
            FROM dashboard_stats
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_where(
        &self,
        table: SourceTable,
        filter: Option<(&str, &str)>,
    ) -> Result<i64, AppError> {
        let count = match filter {
            Some((column, value)) => {
                // Column names are interpolated, so only whitelisted ones pass.
                if !table.filterable_columns().contains(&column) {
                    return Err(AppError::Internal(format!(
                        "unsupported count filter column '{column}' on {}",
                        table.table_name()
                    )));
                }
                sqlx::query_scalar::<_, i64>(&format!(
                    "SELECT COUNT(*) FROM {} WHERE {column} = $1",
                    table.table_name()
                ))
                .bind(value)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(&format!(
                    "SELECT COUNT(*) FROM {}",
                    table.table_name()
                ))
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(count)
    }

    async fn update_by_id(&self, id: &str, update: StatUpdate) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE dashboard_stats
            SET stat_value = $2, stat_change = $3, updated_at = $4
            WHERE id = $1::uuid
            "#,
        )
        .bind(id)
        .bind(&update.stat_value)
        .bind(update.stat_change)
        .bind(update.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("statistic row {id}")));
        }
        Ok(())
    }

    async fn insert(&self, stat: NewStat) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO dashboard_stats (id, stat_name, stat_value, stat_change, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&stat.stat_name)
        .bind(&stat.stat_value)
        .bind(stat.stat_change)
        .bind(stat.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
