//! In-memory stat store for tests and local development.
//!
//! Counts are configured per source table rather than derived from row data;
//! for a filtered count the configured value is taken to be the count after
//! the filter. Individual operations can be made to fail to exercise the
//! aggregator's abort-on-first-error behavior.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SourceTable, StatStore};
use crate::errors::AppError;
use crate::models::statistic::{DashboardStat, NewStat, StatUpdate};

/// Operation at which an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    FetchAll,
    Count(SourceTable),
    Update,
    Insert,
}

/// In-memory [`StatStore`] implementation. Data is lost on drop.
#[derive(Debug, Default)]
pub struct MemStatStore {
    rows: RwLock<Vec<DashboardStat>>,
    counts: RwLock<HashMap<SourceTable, i64>>,
    fail_on: RwLock<Option<FailurePoint>>,
}

impl MemStatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count reported for a source table.
    pub async fn set_count(&self, table: SourceTable, count: i64) {
        self.counts.write().await.insert(table, count);
    }

    /// Make the given operation fail until cleared.
    pub async fn fail_on(&self, point: FailurePoint) {
        *self.fail_on.write().await = Some(point);
    }

    pub async fn clear_failure(&self) {
        *self.fail_on.write().await = None;
    }

    /// Snapshot of all stored rows, for assertions.
    pub async fn rows(&self) -> Vec<DashboardStat> {
        self.rows.read().await.clone()
    }

    async fn check_failure(&self, point: FailurePoint) -> Result<(), AppError> {
        if *self.fail_on.read().await == Some(point) {
            return Err(AppError::Internal(format!("simulated store failure at {point:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl StatStore for MemStatStore {
    async fn fetch_all(&self) -> Result<Vec<DashboardStat>, AppError> {
        self.check_failure(FailurePoint::FetchAll).await?;
        Ok(self.rows.read().await.clone())
    }

    async fn count_where(
        &self,
        table: SourceTable,
        _filter: Option<(&str, &str)>,
    ) -> Result<i64, AppError> {
        self.check_failure(FailurePoint::Count(table)).await?;
        Ok(self.counts.read().await.get(&table).copied().unwrap_or(0))
    }

    async fn update_by_id(&self, id: &str, update: StatUpdate) -> Result<(), AppError> {
        self.check_failure(FailurePoint::Update).await?;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("statistic row {id}")))?;
        row.stat_value = update.stat_value;
        row.stat_change = update.stat_change;
        row.updated_at = Some(update.updated_at);
        Ok(())
    }

    async fn insert(&self, stat: NewStat) -> Result<(), AppError> {
        self.check_failure(FailurePoint::Insert).await?;
        let mut rows = self.rows.write().await;
        // Same uniqueness guarantee the backing schema enforces.
        if rows.iter().any(|r| r.stat_name == stat.stat_name) {
            return Err(AppError::Internal(format!(
                "duplicate stat_name '{}'",
                stat.stat_name
            )));
        }
        rows.push(DashboardStat {
            id: Uuid::new_v4().to_string(),
            stat_name: stat.stat_name,
            stat_value: stat.stat_value,
            stat_change: stat.stat_change,
            trend: None,
            compare_text: None,
            updated_at: Some(stat.updated_at),
        });
        Ok(())
    }
}
