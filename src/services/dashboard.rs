//! Dashboard statistics aggregation and refresh.
//!
//! A refresh pass recomputes the tracked statistics from the source tables
//! and upserts each one keyed by `stat_name`. Every store call is awaited
//! sequentially; there is no cross-row transaction, no retry, and no
//! scheduling — each invocation is an independent best-effort pass.
//! Overlapping passes race read-then-write and the store's last write wins,
//! which is accepted for an admin-triggered refresh (callers serialize by
//! disabling the trigger while a pass is outstanding).

use chrono::Utc;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::statistic::{
    parse_stat_value, DashboardStat, NewStat, StatUpdate, STAT_ACTIVE_LISTINGS,
    STAT_PROPERTIES_SOLD, STAT_USERS_AGENTS,
};
use crate::store::{SourceTable, StatStore};

/// Listing status that qualifies a property as an active listing.
const FOR_SALE: &str = "For Sale";

/// Outcome reported to the caller of a refresh pass.
#[derive(Debug, Serialize)]
pub struct RefreshOutcome {
    pub success: bool,
    pub message: String,
}

/// Fetch the current set of dashboard statistics without recomputing anything.
pub async fn get_stats<S: StatStore>(store: &S) -> Result<Vec<DashboardStat>, AppError> {
    store.fetch_all().await
}

/// Recompute the tracked statistics and persist them.
///
/// Any failure aborts the pass at that point and its error text is carried in
/// the outcome message; statistics already written stay committed.
pub async fn refresh_stats<S: StatStore>(store: &S) -> RefreshOutcome {
    match run_refresh(store).await {
        Ok(()) => RefreshOutcome {
            success: true,
            message: "Dashboard statistics refreshed successfully".to_string(),
        },
        Err(e) => {
            tracing::error!(error = %e, "Dashboard statistics refresh failed");
            RefreshOutcome {
                success: false,
                message: e.to_string(),
            }
        }
    }
}

async fn run_refresh<S: StatStore>(store: &S) -> Result<(), AppError> {
    // Baseline for percent-change computation.
    let current = store.fetch_all().await?;

    let active_listings = store
        .count_where(SourceTable::Properties, Some(("status", FOR_SALE)))
        .await?;
    let users = store.count_where(SourceTable::Profiles, None).await?;
    let sales = store.count_where(SourceTable::Sales, None).await?;

    let candidates = [
        (STAT_ACTIVE_LISTINGS, active_listings),
        (STAT_USERS_AGENTS, users),
        (STAT_PROPERTIES_SOLD, sales),
    ];

    for (name, count) in candidates {
        let now = Utc::now();
        match current.iter().find(|s| s.stat_name == name) {
            Some(existing) => {
                let old = parse_stat_value(&existing.stat_value);
                store
                    .update_by_id(
                        &existing.id,
                        StatUpdate {
                            stat_value: count.to_string(),
                            stat_change: percent_change(old, count),
                            updated_at: now,
                        },
                    )
                    .await?;
            }
            None => {
                store
                    .insert(NewStat {
                        stat_name: name.to_string(),
                        stat_value: count.to_string(),
                        stat_change: 0,
                        updated_at: now,
                    })
                    .await?;
            }
        }
    }

    Ok(())
}

/// Percentage change of `new` relative to `old`, rounded to the nearest
/// integer. Zero when there is no prior baseline to compare against.
fn percent_change(old: i64, new: i64) -> i32 {
    if old > 0 {
        (((new - old) as f64 / old as f64) * 100.0).round() as i32
    } else {
        0
    }
}

/// Find a statistic by name, falling back to a zero placeholder so display
/// code never has to null-check.
pub fn find_stat_by_name(stats: &[DashboardStat], name: &str) -> DashboardStat {
    stats
        .iter()
        .find(|s| s.stat_name == name)
        .cloned()
        .unwrap_or_else(|| DashboardStat::placeholder(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::FailurePoint;
    use crate::store::MemStatStore;

    async fn store_with_counts(listings: i64, users: i64, sales: i64) -> MemStatStore {
        let store = MemStatStore::new();
        store.set_count(SourceTable::Properties, listings).await;
        store.set_count(SourceTable::Profiles, users).await;
        store.set_count(SourceTable::Sales, sales).await;
        store
    }

    fn row_by_name<'a>(rows: &'a [DashboardStat], name: &str) -> &'a DashboardStat {
        rows.iter()
            .find(|r| r.stat_name == name)
            .unwrap_or_else(|| panic!("missing row {name}"))
    }

    #[tokio::test]
    async fn first_refresh_inserts_all_tracked_stats() {
        let store = store_with_counts(42, 130, 17).await;

        let outcome = refresh_stats(&store).await;
        assert!(outcome.success, "{}", outcome.message);

        let rows = store.rows().await;
        assert_eq!(rows.len(), 3);

        let listings = row_by_name(&rows, STAT_ACTIVE_LISTINGS);
        assert_eq!(listings.stat_value, "42");
        assert_eq!(listings.stat_change, 0);
        assert!(!listings.id.is_empty());
        assert!(listings.updated_at.is_some());

        assert_eq!(row_by_name(&rows, STAT_USERS_AGENTS).stat_value, "130");
        assert_eq!(row_by_name(&rows, STAT_PROPERTIES_SOLD).stat_value, "17");
    }

    #[tokio::test]
    async fn refresh_updates_existing_row_with_percent_change() {
        let store = store_with_counts(40, 10, 5).await;
        assert!(refresh_stats(&store).await.success);

        // Listings grow from 40 to 50: +25%.
        store.set_count(SourceTable::Properties, 50).await;
        let outcome = refresh_stats(&store).await;
        assert!(outcome.success, "{}", outcome.message);

        let rows = store.rows().await;
        let listings = row_by_name(&rows, STAT_ACTIVE_LISTINGS);
        assert_eq!(listings.stat_value, "50");
        assert_eq!(listings.stat_change, 25);
    }

    #[tokio::test]
    async fn refresh_reports_negative_change_on_decline() {
        let store = store_with_counts(100, 10, 5).await;
        assert!(refresh_stats(&store).await.success);

        store.set_count(SourceTable::Properties, 75).await;
        assert!(refresh_stats(&store).await.success);

        let rows = store.rows().await;
        assert_eq!(row_by_name(&rows, STAT_ACTIVE_LISTINGS).stat_change, -25);
    }

    #[tokio::test]
    async fn zero_baseline_reports_zero_change() {
        let store = store_with_counts(0, 0, 0).await;
        assert!(refresh_stats(&store).await.success);

        store.set_count(SourceTable::Properties, 15).await;
        assert!(refresh_stats(&store).await.success);

        let rows = store.rows().await;
        let listings = row_by_name(&rows, STAT_ACTIVE_LISTINGS);
        assert_eq!(listings.stat_value, "15");
        assert_eq!(listings.stat_change, 0);
    }

    #[tokio::test]
    async fn refresh_is_idempotent_under_stable_counts() {
        let store = store_with_counts(42, 130, 17).await;
        assert!(refresh_stats(&store).await.success);
        assert!(refresh_stats(&store).await.success);

        let rows = store.rows().await;
        assert_eq!(rows.len(), 3, "no duplicate rows per stat_name");
        for row in &rows {
            assert_eq!(row.stat_change, 0, "{} changed", row.stat_name);
        }
    }

    #[tokio::test]
    async fn repeated_refreshes_never_duplicate_names() {
        let store = store_with_counts(1, 2, 3).await;
        for i in 0..5 {
            store.set_count(SourceTable::Properties, i + 1).await;
            assert!(refresh_stats(&store).await.success);
        }
        assert_eq!(store.rows().await.len(), 3);
    }

    #[tokio::test]
    async fn failed_listing_count_aborts_before_any_write() {
        let store = store_with_counts(42, 130, 17).await;
        store
            .fail_on(FailurePoint::Count(SourceTable::Properties))
            .await;

        let outcome = refresh_stats(&store).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("simulated store failure"));
        assert!(store.rows().await.is_empty(), "no writes before the failure");
    }

    #[tokio::test]
    async fn later_write_failure_keeps_earlier_writes_committed() {
        let store = store_with_counts(40, 10, 5).await;
        assert!(refresh_stats(&store).await.success);

        // Second pass: every per-stat write is an update, and they all fail.
        // The baseline fetch and counts succeed, so the pass aborts on the
        // first statistic's write with nothing rolled back from pass one.
        store.set_count(SourceTable::Properties, 50).await;
        store.fail_on(FailurePoint::Update).await;

        let outcome = refresh_stats(&store).await;
        assert!(!outcome.success);

        let rows = store.rows().await;
        assert_eq!(rows.len(), 3);
        assert_eq!(
            row_by_name(&rows, STAT_ACTIVE_LISTINGS).stat_value,
            "40",
            "failed update must not advance the stored value"
        );
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_in_outcome_message() {
        let store = store_with_counts(1, 1, 1).await;
        store.fail_on(FailurePoint::FetchAll).await;

        let outcome = refresh_stats(&store).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("FetchAll"));

        store.clear_failure().await;
        assert!(refresh_stats(&store).await.success);
    }

    #[tokio::test]
    async fn get_stats_propagates_store_errors() {
        let store = MemStatStore::new();
        store.fail_on(FailurePoint::FetchAll).await;
        assert!(get_stats(&store).await.is_err());
    }

    #[test]
    fn percent_change_rounds_to_nearest_integer() {
        assert_eq!(percent_change(40, 50), 25);
        assert_eq!(percent_change(3, 4), 33);
        assert_eq!(percent_change(3, 2), -33);
        assert_eq!(percent_change(8, 9), 13); // 12.5 rounds away from zero
        assert_eq!(percent_change(0, 100), 0);
        assert_eq!(percent_change(10, 10), 0);
    }

    #[test]
    fn find_stat_falls_back_to_placeholder() {
        let found = find_stat_by_name(&[], "foo");
        assert_eq!(found.id, "");
        assert_eq!(found.stat_value, "0");
        assert_eq!(found.stat_change, 0);

        let rows = vec![DashboardStat {
            id: "abc".to_string(),
            stat_name: STAT_ACTIVE_LISTINGS.to_string(),
            stat_value: "7".to_string(),
            stat_change: 2,
            trend: None,
            compare_text: None,
            updated_at: None,
        }];
        let found = find_stat_by_name(&rows, STAT_ACTIVE_LISTINGS);
        assert_eq!(found.id, "abc");
        assert_eq!(found.stat_value, "7");
    }
}
