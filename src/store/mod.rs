//! Stat store capability: the row-store operations the dashboard aggregator
//! needs, abstracted so the Postgres backend can be swapped for an in-memory
//! fake in tests.

pub mod memory;
pub mod postgres;

pub use memory::MemStatStore;
pub use postgres::PgStatStore;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::statistic::{DashboardStat, NewStat, StatUpdate};

/// Source tables the aggregator derives counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTable {
    Properties,
    Profiles,
    Sales,
}

impl SourceTable {
    pub fn table_name(self) -> &'static str {
        match self {
            SourceTable::Properties => "properties",
            SourceTable::Profiles => "profiles",
            SourceTable::Sales => "sales",
        }
    }

    /// Columns an equality count filter may reference for this table.
    pub fn filterable_columns(self) -> &'static [&'static str] {
        match self {
            SourceTable::Properties => &["status"],
            SourceTable::Profiles | SourceTable::Sales => &[],
        }
    }
}

/// Access to the statistic rows and source-table counts.
///
/// Mirrors the four row-store calls the aggregator issues: fetch-all,
/// count-where, update-by-id, and insert. Every call is independent; the
/// store offers no transactions across calls.
#[async_trait]
pub trait StatStore: Send + Sync {
    /// Every statistic row, unfiltered.
    async fn fetch_all(&self) -> Result<Vec<DashboardStat>, AppError>;

    /// Count rows in a source table, optionally matching a single
    /// `(column, value)` equality filter.
    async fn count_where(
        &self,
        table: SourceTable,
        filter: Option<(&str, &str)>,
    ) -> Result<i64, AppError>;

    /// Overwrite value, change, and timestamp on the row with the given id.
    async fn update_by_id(&self, id: &str, update: StatUpdate) -> Result<(), AppError>;

    /// Create a new statistic row.
    async fn insert(&self, stat: NewStat) -> Result<(), AppError>;
}
